use crate::field::TradeField;

/// 자유 텍스트 검색 대상 필드. 이 중 하나 이상이 있는 문서만 검색된다.
pub const SEARCHABLE_FIELDS: [TradeField; 4] = [
    TradeField::Counterparty,
    TradeField::InstrumentId,
    TradeField::InstrumentName,
    TradeField::Trader,
];

/// 공백으로 나눈 검색어들. 어느 검색어든 하나라도 포함하면 일치한다.
///
/// 대소문자 무시는 ASCII 에만 적용된다. SQL `lower()` 가 ASCII 만 접기 때문에
/// 검색어도 같은 규칙으로 접는다. `É` 와 `é` 는 서로 다른 글자로 본다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    terms: Vec<String>,
}

impl TextQuery {
    pub fn parse(search: &str) -> Self {
        let mut terms: Vec<String> = Vec::new();
        for term in search.split_whitespace().map(str::to_ascii_lowercase) {
            if !terms.contains(&term) {
                terms.push(term);
            }
        }
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn fields(&self) -> &'static [TradeField] {
        &SEARCHABLE_FIELDS
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_lowercases_and_dedupes() {
        let query = TextQuery::parse("  Tesla  tesla APPLE ");
        assert_eq!(query.terms(), ["tesla", "apple"]);
    }

    #[test]
    fn folds_ascii_case_only() {
        let query = TextQuery::parse("SOCIÉTÉ Générale");
        assert_eq!(query.terms(), ["sociÉtÉ", "générale"]);
    }

    #[test]
    fn blank_search_is_empty() {
        assert!(TextQuery::parse("").is_empty());
        assert!(TextQuery::parse(" \t ").is_empty());
    }
}
