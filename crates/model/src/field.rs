use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// 정렬/필터 대상이 되는 거래 필드 (내장 레코드는 점 경로로 표기)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeField {
    #[serde(rename = "asset_class")]
    AssetClass,
    #[serde(rename = "counterparty")]
    Counterparty,
    #[serde(rename = "instrument_id")]
    InstrumentId,
    #[serde(rename = "instrument_name")]
    InstrumentName,
    #[serde(rename = "trade_date_time")]
    TradeDateTime,
    #[serde(rename = "trade_details.buySellIndicator")]
    BuySellIndicator,
    #[serde(rename = "trade_details.price")]
    Price,
    #[serde(rename = "trade_details.quantity")]
    Quantity,
    #[serde(rename = "trade_id")]
    TradeId,
    #[serde(rename = "trader")]
    Trader,
}

impl TradeField {
    pub const ALL: [TradeField; 10] = [
        TradeField::AssetClass,
        TradeField::Counterparty,
        TradeField::InstrumentId,
        TradeField::InstrumentName,
        TradeField::TradeDateTime,
        TradeField::BuySellIndicator,
        TradeField::Price,
        TradeField::Quantity,
        TradeField::TradeId,
        TradeField::Trader,
    ];

    /// 에러 메시지용 허용 목록. `ALL` 과 같은 순서.
    pub const ALLOWED: &'static str = "asset_class, counterparty, instrument_id, instrument_name, \
        trade_date_time, trade_details.buySellIndicator, trade_details.price, \
        trade_details.quantity, trade_id, trader";

    /// 저장 문서 기준 경로
    pub fn path(&self) -> &'static str {
        match self {
            TradeField::AssetClass => "asset_class",
            TradeField::Counterparty => "counterparty",
            TradeField::InstrumentId => "instrument_id",
            TradeField::InstrumentName => "instrument_name",
            TradeField::TradeDateTime => "trade_date_time",
            TradeField::BuySellIndicator => "trade_details.buySellIndicator",
            TradeField::Price => "trade_details.price",
            TradeField::Quantity => "trade_details.quantity",
            TradeField::TradeId => "trade_id",
            TradeField::Trader => "trader",
        }
    }
}

impl Display for TradeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl FromStr for TradeField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TradeField::ALL
            .into_iter()
            .find(|field| field.path() == s)
            .ok_or_else(|| format!("Invalid TradeField: {}", s))
    }
}
