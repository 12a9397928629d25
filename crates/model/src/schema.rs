use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::ValidationError;

/// 저장소와 주고받는 원시 문서 (내부 필드 이름 사용)
pub type Document = Map<String, Value>;

/// 거래 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            _ => Err(format!("Invalid Side: {}", s)),
        }
    }
}

/// 필터에서 허용하는 자산군. 저장되는 asset_class 는 자유 문자열이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    Bond,
    FX,
    Equity,
    Crypto,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Bond => "Bond",
            AssetClass::FX => "FX",
            AssetClass::Equity => "Equity",
            AssetClass::Crypto => "Crypto",
        }
    }
}

impl Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bond" => Ok(AssetClass::Bond),
            "FX" => Ok(AssetClass::FX),
            "Equity" => Ok(AssetClass::Equity),
            "Crypto" => Ok(AssetClass::Crypto),
            _ => Err(format!("Invalid AssetClass: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDetails {
    pub buy_sell_indicator: Side,
    pub price: f64,
    pub quantity: i64,
}

/// 거래 체결 한 건. 응답은 외부 별칭(camelCase)으로 직렬화된다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub asset_class: Option<String>,
    pub counterparty: Option<String>,
    pub instrument_id: String,
    pub instrument_name: String,
    pub trade_date_time: DateTime<Utc>,
    pub trade_details: TradeDetails,
    pub trade_id: Option<String>,
    pub trader: String,
}

impl Trade {
    /// 내부 필드 이름으로 된 저장용 문서
    pub fn to_document(&self) -> Document {
        let mut details = Map::new();
        details.insert(
            "buySellIndicator".into(),
            Value::from(self.trade_details.buy_sell_indicator.as_str()),
        );
        details.insert("price".into(), Value::from(self.trade_details.price));
        details.insert("quantity".into(), Value::from(self.trade_details.quantity));

        let mut doc = Map::new();
        doc.insert("asset_class".into(), Value::from(self.asset_class.clone()));
        doc.insert("counterparty".into(), Value::from(self.counterparty.clone()));
        doc.insert("instrument_id".into(), Value::from(self.instrument_id.clone()));
        doc.insert(
            "instrument_name".into(),
            Value::from(self.instrument_name.clone()),
        );
        doc.insert(
            "trade_date_time".into(),
            Value::from(format_timestamp(&self.trade_date_time)),
        );
        doc.insert("trade_details".into(), Value::Object(details));
        doc.insert("trade_id".into(), Value::from(self.trade_id.clone()));
        doc.insert("trader".into(), Value::from(self.trader.clone()));
        doc
    }
}

// (내부 이름, 외부 별칭)
const TRADE_ALIASES: &[(&str, &str)] = &[
    ("asset_class", "assetClass"),
    ("counterparty", "counterparty"),
    ("instrument_id", "instrumentId"),
    ("instrument_name", "instrumentName"),
    ("trade_date_time", "tradeDateTime"),
    ("trade_details", "tradeDetails"),
    ("trade_id", "tradeId"),
    ("trader", "trader"),
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// 느슨한 입력(쓰기 요청 본문 또는 저장소 문서)을 검증해 `Trade` 로 만든다.
///
/// 각 필드는 외부 별칭과 내부 이름 모두로 찾으며, 둘 다 있으면 별칭이 우선한다.
/// `null` 은 값이 없는 것으로 취급한다.
pub fn validate(raw: &Value) -> Result<Trade, ValidationError> {
    let obj = raw
        .as_object()
        .ok_or(ValidationError::NotAnObject { field: "trade" })?;

    let details = required(obj, "trade_details")?
        .as_object()
        .ok_or(ValidationError::NotAnObject {
            field: "trade_details",
        })?;

    Ok(Trade {
        asset_class: optional_string(obj, "asset_class")?,
        counterparty: optional_string(obj, "counterparty")?,
        instrument_id: string(required(obj, "instrument_id")?, "instrument_id")?,
        instrument_name: string(required(obj, "instrument_name")?, "instrument_name")?,
        trade_date_time: timestamp(required(obj, "trade_date_time")?, "trade_date_time")?,
        trade_details: validate_details(details)?,
        trade_id: optional_string(obj, "trade_id")?,
        trader: string(required(obj, "trader")?, "trader")?,
    })
}

fn validate_details(details: &Map<String, Value>) -> Result<TradeDetails, ValidationError> {
    const SIDE: &str = "trade_details.buySellIndicator";
    const PRICE: &str = "trade_details.price";
    const QUANTITY: &str = "trade_details.quantity";

    let side = string(present(details, "buySellIndicator", SIDE)?, SIDE)?;
    let buy_sell_indicator =
        Side::from_str(&side).map_err(|_| ValidationError::InvalidVariant {
            field: SIDE,
            value: side,
            allowed: "BUY, SELL",
        })?;

    let price = match present(details, "price", PRICE)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or(ValidationError::InvalidType {
        field: PRICE,
        expected: "a number",
    })?;
    if !price.is_finite() {
        return Err(ValidationError::NotFinite { field: PRICE });
    }
    if price <= 0.0 {
        return Err(ValidationError::NotPositive { field: PRICE });
    }

    let quantity = match present(details, "quantity", QUANTITY)? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or(ValidationError::InvalidType {
        field: QUANTITY,
        expected: "an integer",
    })?;
    if quantity <= 0 {
        return Err(ValidationError::NotPositive { field: QUANTITY });
    }

    Ok(TradeDetails {
        buy_sell_indicator,
        price,
        quantity,
    })
}

fn alias_of(field: &str) -> &str {
    TRADE_ALIASES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, alias)| *alias)
        .unwrap_or(field)
}

fn lookup<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    let non_null = |v: &&Value| !v.is_null();
    obj.get(alias_of(field))
        .filter(non_null)
        .or_else(|| obj.get(field).filter(non_null))
}

fn required<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, ValidationError> {
    lookup(obj, field).ok_or(ValidationError::Missing { field })
}

fn present<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<&'a Value, ValidationError> {
    obj.get(key)
        .filter(|v| !v.is_null())
        .ok_or(ValidationError::Missing { field })
}

fn string(value: &Value, field: &'static str) -> Result<String, ValidationError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(ValidationError::InvalidType {
            field,
            expected: "a string",
        })
}

fn optional_string(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    lookup(obj, field).map(|v| string(v, field)).transpose()
}

fn timestamp(value: &Value, field: &'static str) -> Result<DateTime<Utc>, ValidationError> {
    let parsed = match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .filter(storable),
        _ => {
            return Err(ValidationError::InvalidType {
                field,
                expected: "a date-time string",
            })
        }
    };
    parsed.ok_or_else(|| ValidationError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}

/// RFC 3339, 시간대 없는 ISO 8601(UTC 로 간주), 날짜만 있는 형식을 받는다.
/// UTC 기준 0000..=9999 년 밖의 값은 저장 형식으로 되돌릴 수 없으므로 거부한다.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    parse_any(raw.trim()).filter(storable)
}

fn storable(ts: &DateTime<Utc>) -> bool {
    (0..=9999).contains(&ts.year())
}

fn parse_any(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// 고정 폭 UTC 표기. 문자열 순서가 시간 순서와 같다.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
