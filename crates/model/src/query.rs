use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::field::TradeField;
use crate::schema::{format_timestamp, AssetClass, Side};

/// 조건에 쓰이는 값
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Timestamp(DateTime<Utc>),
}

impl Scalar {
    pub fn to_value(&self) -> Value {
        match self {
            Scalar::Text(text) => Value::from(text.as_str()),
            Scalar::Number(n) => Value::from(*n),
            Scalar::Timestamp(ts) => Value::from(format_timestamp(ts)),
        }
    }
}

/// 구간 조건. 한쪽만 있을 수 있지만 둘 다 비어 있지는 않다.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub gte: Option<Scalar>,
    pub lte: Option<Scalar>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals(Scalar),
    Range(Bounds),
}

impl Condition {
    pub fn to_value(&self) -> Value {
        match self {
            Condition::Equals(scalar) => scalar.to_value(),
            Condition::Range(bounds) => {
                let mut ops = Map::new();
                if let Some(gte) = &bounds.gte {
                    ops.insert("$gte".into(), gte.to_value());
                }
                if let Some(lte) = &bounds.lte {
                    ops.insert("$lte".into(), lte.to_value());
                }
                Value::Object(ops)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldCondition {
    pub field: TradeField,
    pub condition: Condition,
}

/// 필드 조건들의 논리곱. 필드당 조건은 최대 하나.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TradePredicate {
    conditions: Vec<FieldCondition>,
}

impl TradePredicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// 같은 필드에 이미 조건이 있으면 교체한다.
    pub fn push(&mut self, field: TradeField, condition: Condition) {
        match self.conditions.iter_mut().find(|c| c.field == field) {
            Some(existing) => existing.condition = condition,
            None => self.conditions.push(FieldCondition { field, condition }),
        }
    }

    pub fn get(&self, field: TradeField) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.field == field)
            .map(|c| &c.condition)
    }

    pub fn conditions(&self) -> &[FieldCondition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// 문서 저장소 형식의 쿼리 문서 (로그/디버깅용)
    pub fn to_document(&self) -> Value {
        let doc: Map<String, Value> = self
            .conditions
            .iter()
            .map(|c| (c.field.path().to_string(), c.condition.to_value()))
            .collect();
        Value::Object(doc)
    }
}

/// 필터 파라미터. `None` 은 "주어지지 않음" 이며 0 이나 빈 값과 구분된다.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TradeFilter {
    pub asset_class: Option<AssetClass>,
    pub trade_type: Option<Side>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// 필터 파라미터를 하나의 조건식으로 만든다.
///
/// 구간 쌍은 독립적으로 처리한다: 상한만 있으면 `<= max`, 하한만 있으면 `>= min`,
/// 둘 다 있으면 두 한쪽 조건 대신 `{>= min, <= max}` 하나, 둘 다 없으면 생략.
pub fn build(filter: &TradeFilter) -> TradePredicate {
    let mut predicate = TradePredicate::new();

    if let Some(asset_class) = filter.asset_class {
        predicate.push(
            TradeField::AssetClass,
            Condition::Equals(Scalar::Text(asset_class.to_string())),
        );
    }

    if let Some(range) = range(
        filter.min_price.map(Scalar::Number),
        filter.max_price.map(Scalar::Number),
    ) {
        predicate.push(TradeField::Price, range);
    }

    if let Some(range) = range(
        filter.start.map(Scalar::Timestamp),
        filter.end.map(Scalar::Timestamp),
    ) {
        predicate.push(TradeField::TradeDateTime, range);
    }

    if let Some(side) = filter.trade_type {
        predicate.push(
            TradeField::BuySellIndicator,
            Condition::Equals(Scalar::Text(side.to_string())),
        );
    }

    predicate
}

fn range(gte: Option<Scalar>, lte: Option<Scalar>) -> Option<Condition> {
    match (gte, lte) {
        (None, None) => None,
        (gte, lte) => Some(Condition::Range(Bounds { gte, lte })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use serde_json::json;

    fn price_bounds(predicate: &TradePredicate) -> Option<&Bounds> {
        match predicate.get(TradeField::Price) {
            Some(Condition::Range(bounds)) => Some(bounds),
            _ => None,
        }
    }

    #[test]
    fn empty_filter_is_unconstrained() {
        let predicate = build(&TradeFilter::default());
        assert!(predicate.is_empty());
        assert_eq!(predicate.to_document(), json!({}));
    }

    #[test]
    fn both_price_bounds_form_a_single_condition() {
        let predicate = build(&TradeFilter {
            min_price: Some(10.0),
            max_price: Some(50.0),
            ..Default::default()
        });

        assert_eq!(predicate.len(), 1);
        assert_eq!(
            predicate.to_document(),
            json!({ "trade_details.price": { "$gte": 10.0, "$lte": 50.0 } })
        );
    }

    #[test]
    fn min_price_alone_has_no_upper_bound() {
        let predicate = build(&TradeFilter {
            min_price: Some(10.0),
            ..Default::default()
        });

        let bounds = price_bounds(&predicate).unwrap();
        assert_eq!(bounds.gte, Some(Scalar::Number(10.0)));
        assert_eq!(bounds.lte, None);
    }

    #[test]
    fn max_price_alone_has_no_lower_bound() {
        let predicate = build(&TradeFilter {
            max_price: Some(50.0),
            ..Default::default()
        });

        assert_eq!(
            predicate.to_document(),
            json!({ "trade_details.price": { "$lte": 50.0 } })
        );
    }

    #[test]
    fn zero_min_price_is_a_real_bound() {
        let predicate = build(&TradeFilter {
            min_price: Some(0.0),
            ..Default::default()
        });

        let bounds = price_bounds(&predicate).unwrap();
        assert_eq!(bounds.gte, Some(Scalar::Number(0.0)));
    }

    #[test]
    fn time_bounds_follow_the_same_rules() {
        let start = Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2022, 6, 30, 0, 0, 0).unwrap();

        let predicate = build(&TradeFilter {
            start: Some(start),
            end: Some(end),
            ..Default::default()
        });
        assert_eq!(
            predicate.to_document(),
            json!({
                "trade_date_time": {
                    "$gte": "2022-06-01T00:00:00.000000Z",
                    "$lte": "2022-06-30T00:00:00.000000Z"
                }
            })
        );

        let predicate = build(&TradeFilter {
            end: Some(end),
            ..Default::default()
        });
        assert_eq!(
            predicate.get(TradeField::TradeDateTime),
            Some(&Condition::Range(Bounds {
                gte: None,
                lte: Some(Scalar::Timestamp(end)),
            }))
        );
    }

    #[test]
    fn equality_filters_are_included_verbatim() {
        let predicate = build(&TradeFilter {
            asset_class: Some(AssetClass::FX),
            trade_type: Some(Side::Sell),
            ..Default::default()
        });

        assert_eq!(
            predicate.to_document(),
            json!({
                "asset_class": "FX",
                "trade_details.buySellIndicator": "SELL"
            })
        );
    }

    #[test]
    fn conditions_keep_parameter_order() {
        let predicate = build(&TradeFilter {
            asset_class: Some(AssetClass::Bond),
            trade_type: Some(Side::Buy),
            min_price: Some(1.0),
            start: Some(Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        });

        let fields: Vec<_> = predicate.conditions().iter().map(|c| c.field).collect();
        assert_eq!(
            fields,
            vec![
                TradeField::AssetClass,
                TradeField::Price,
                TradeField::TradeDateTime,
                TradeField::BuySellIndicator,
            ]
        );
    }

    #[test]
    fn push_replaces_existing_condition() {
        let mut predicate = TradePredicate::new();
        predicate.push(
            TradeField::Trader,
            Condition::Equals(Scalar::Text("a".into())),
        );
        predicate.push(
            TradeField::Trader,
            Condition::Equals(Scalar::Text("b".into())),
        );
        assert_eq!(predicate.len(), 1);
        assert_eq!(predicate.to_document(), json!({ "trader": "b" }));
    }

    proptest! {
        #[test]
        fn price_pair_yields_at_most_one_condition(
            min in proptest::option::of(0.0f64..1_000.0),
            max in proptest::option::of(0.0f64..1_000.0),
        ) {
            let predicate = build(&TradeFilter {
                min_price: min,
                max_price: max,
                ..Default::default()
            });

            match (min, max) {
                (None, None) => prop_assert!(predicate.get(TradeField::Price).is_none()),
                _ => {
                    prop_assert_eq!(predicate.len(), 1);
                    let bounds = price_bounds(&predicate).unwrap();
                    prop_assert_eq!(bounds.gte.clone(), min.map(Scalar::Number));
                    prop_assert_eq!(bounds.lte.clone(), max.map(Scalar::Number));
                }
            }
        }
    }
}
