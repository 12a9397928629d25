use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::field::TradeField;

/// 정렬 방향. 쿼리 파라미터로는 `Asc` / `Des` 로 들어온다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "Asc")]
    Ascending,
    #[default]
    #[serde(rename = "Des")]
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Asc" => Ok(SortDirection::Ascending),
            "Des" => Ok(SortDirection::Descending),
            _ => Err(format!("Invalid SortDirection: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: TradeField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn to_document(&self) -> Value {
        let order = match self.direction {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        };
        let mut doc = Map::new();
        doc.insert(self.field.path().to_string(), Value::from(order));
        Value::Object(doc)
    }
}

/// 필드가 없으면 정렬하지 않는다. 방향이 없으면 내림차순.
pub fn resolve(field: Option<TradeField>, direction: Option<SortDirection>) -> Option<SortSpec> {
    let field = field?;
    Some(SortSpec {
        field,
        direction: direction.unwrap_or_default(),
    })
}
