/// 거래 레코드 엔티티 모듈
pub mod trade {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "trades")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = true)]
        pub id: i64,

        /// 외부 거래 ID (고유하지 않을 수 있음)
        #[sea_orm(column_type = "Text", nullable)]
        pub trade_id: Option<String>,

        /// 자산군 (Bond, Equity, FX, Crypto ...)
        #[sea_orm(column_type = "Text", nullable)]
        pub asset_class: Option<String>,

        /// 거래 상대방
        #[sea_orm(column_type = "Text", nullable)]
        pub counterparty: Option<String>,

        /// 종목 ID (ISIN 등)
        #[sea_orm(column_type = "Text")]
        pub instrument_id: String,

        /// 종목 이름
        #[sea_orm(column_type = "Text")]
        pub instrument_name: String,

        /// 체결 UTC 시간 (고정 폭 RFC 3339)
        #[sea_orm(column_type = "Text")]
        pub trade_date_time: String,

        /// 거래 방향 (BUY, SELL)
        #[sea_orm(column_type = "Text")]
        pub buy_sell_indicator: String,

        /// 체결 가격
        #[sea_orm(column_type = "Double")]
        pub price: f64,

        /// 체결 수량
        pub quantity: i64,

        /// 트레이더 이름
        #[sea_orm(column_type = "Text")]
        pub trader: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
