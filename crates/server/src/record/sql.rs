use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, Index, LikeExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Schema, Set,
};
use serde_json::{Map, Value};
use tracing::{debug, info};
use tradebook_model::{
    format_timestamp, query, Document, Scalar, SortDirection, SortSpec, TextQuery, Trade,
    TradeField, TradePredicate,
};

use super::entities::trade;
use super::{Page, StoreError, TradeStore};

/// sea-orm 기반 거래 저장소 (SQLite / PostgreSQL)
pub struct SqlTradeStore {
    db: DatabaseConnection,
}

impl SqlTradeStore {
    /// 연결 문자열로 저장소에 연결하고 테이블/인덱스를 준비한다.
    /// SQLite 파일을 새로 만들려면 `sqlite://trades.db?mode=rwc` 처럼 지정한다.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        info!("Connecting to trade store: {}", redact(url));

        let mut options = ConnectOptions::new(url.to_owned());
        options.sqlx_logging(false);

        let db = Database::connect(options).await?;

        Self::from_connection(db).await
    }

    /// 이미 열린 연결 위에 저장소를 만든다.
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self, StoreError> {
        let backend = db.get_database_backend();
        let schema = Schema::new(backend);

        // 테이블 생성 (IF NOT EXISTS)
        let mut create_table_stmt = schema.create_table_from_entity(trade::Entity);
        create_table_stmt.if_not_exists();

        db.execute(backend.build(&create_table_stmt)).await?;

        let indexes = [
            ("idx_trades_trade_id", trade::Column::TradeId),
            ("idx_trades_trade_date_time", trade::Column::TradeDateTime),
            ("idx_trades_price", trade::Column::Price),
        ];

        for (name, column) in indexes {
            let mut idx = Index::create()
                .name(name)
                .table(trade::Entity)
                .col(column)
                .to_owned();
            idx.if_not_exists();

            if let Err(e) = db.execute(backend.build(&idx)).await {
                debug!("Index {} creation skipped: {}", name, e);
            }
        }

        info!("Trades table initialized");

        Ok(Self { db })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl TradeStore for SqlTradeStore {
    async fn insert(&self, record: &Trade) -> Result<(), StoreError> {
        let model = trade::ActiveModel {
            trade_id: Set(record.trade_id.clone()),
            asset_class: Set(record.asset_class.clone()),
            counterparty: Set(record.counterparty.clone()),
            instrument_id: Set(record.instrument_id.clone()),
            instrument_name: Set(record.instrument_name.clone()),
            trade_date_time: Set(format_timestamp(&record.trade_date_time)),
            buy_sell_indicator: Set(record.trade_details.buy_sell_indicator.to_string()),
            price: Set(record.trade_details.price),
            quantity: Set(record.trade_details.quantity),
            trader: Set(record.trader.clone()),
            ..Default::default()
        };

        trade::Entity::insert(model).exec(&self.db).await?;

        Ok(())
    }

    async fn find(
        &self,
        predicate: &TradePredicate,
        sort: Option<SortSpec>,
        page: Page,
    ) -> Result<Vec<Document>, StoreError> {
        debug!(
            filter = %predicate.to_document(),
            sort = ?sort.map(|s| s.to_document()),
            skip = page.skip,
            limit = page.limit,
            "find trades"
        );

        let mut query = trade::Entity::find().filter(predicate_condition(predicate));

        if let Some(spec) = sort {
            query = query.order_by(column(spec.field), order(spec.direction));
        }
        // 같은 값끼리는 저장 순서
        query = query.order_by_asc(trade::Column::Id);

        if page.skip > 0 {
            query = query.offset(page.skip);
        }
        match page.limit() {
            Some(limit) => query = query.limit(limit),
            // SQLite 는 LIMIT 없는 OFFSET 을 허용하지 않음
            None if page.skip > 0 => query = query.limit(i64::MAX as u64),
            None => {}
        }

        let models = query.all(&self.db).await?;

        Ok(models.into_iter().map(into_document).collect())
    }

    async fn find_text(&self, text: &TextQuery) -> Result<Vec<Document>, StoreError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        debug!(terms = ?text.terms(), "text search");

        let models = trade::Entity::find()
            .filter(text_condition(text))
            .order_by_asc(trade::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(into_document).collect())
    }

    async fn find_one(&self, trade_id: &str) -> Result<Option<Document>, StoreError> {
        let model = trade::Entity::find()
            .filter(trade::Column::TradeId.eq(trade_id))
            .order_by_asc(trade::Column::Id)
            .one(&self.db)
            .await?;

        Ok(model.map(into_document))
    }
}

fn column(field: TradeField) -> trade::Column {
    match field {
        TradeField::AssetClass => trade::Column::AssetClass,
        TradeField::Counterparty => trade::Column::Counterparty,
        TradeField::InstrumentId => trade::Column::InstrumentId,
        TradeField::InstrumentName => trade::Column::InstrumentName,
        TradeField::TradeDateTime => trade::Column::TradeDateTime,
        TradeField::BuySellIndicator => trade::Column::BuySellIndicator,
        TradeField::Price => trade::Column::Price,
        TradeField::Quantity => trade::Column::Quantity,
        TradeField::TradeId => trade::Column::TradeId,
        TradeField::Trader => trade::Column::Trader,
    }
}

fn order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Ascending => Order::Asc,
        SortDirection::Descending => Order::Desc,
    }
}

fn scalar(value: &Scalar) -> sea_orm::Value {
    match value {
        Scalar::Text(text) => text.clone().into(),
        Scalar::Number(n) => (*n).into(),
        // 저장 형식과 같은 고정 폭 문자열로 비교
        Scalar::Timestamp(ts) => format_timestamp(ts).into(),
    }
}

fn predicate_condition(predicate: &TradePredicate) -> Condition {
    let mut condition = Condition::all();

    for fc in predicate.conditions() {
        let col = column(fc.field);
        match &fc.condition {
            query::Condition::Equals(value) => {
                condition = condition.add(col.eq(scalar(value)));
            }
            query::Condition::Range(bounds) => {
                if let Some(gte) = &bounds.gte {
                    condition = condition.add(col.gte(scalar(gte)));
                }
                if let Some(lte) = &bounds.lte {
                    condition = condition.add(col.lte(scalar(lte)));
                }
            }
        }
    }

    condition
}

/// `lower(col) LIKE '%term%'`. `lower()` 는 ASCII 만 접으므로 `TextQuery` 의 검색어도
/// ASCII 만 접혀 있다.
fn text_condition(text: &TextQuery) -> Condition {
    let mut any_term = Condition::any();
    for term in text.terms() {
        let pattern = format!("%{}%", escape_like(term));
        for field in text.fields() {
            let haystack = Expr::expr(Func::lower(Expr::col(column(*field))));
            any_term = any_term.add(haystack.like(LikeExpr::new(pattern.clone()).escape('\\')));
        }
    }

    let mut present = Condition::any();
    for field in text.fields() {
        present = present.add(column(*field).is_not_null());
    }

    Condition::all().add(any_term).add(present)
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 저장된 행을 내부 이름 문서로 되돌린다. trade_details 는 다시 중첩한다.
fn into_document(model: trade::Model) -> Document {
    let mut details = Map::new();
    details.insert(
        "buySellIndicator".into(),
        Value::from(model.buy_sell_indicator),
    );
    details.insert("price".into(), Value::from(model.price));
    details.insert("quantity".into(), Value::from(model.quantity));

    let mut doc = Map::new();
    doc.insert("_id".into(), Value::from(model.id));
    doc.insert("asset_class".into(), Value::from(model.asset_class));
    doc.insert("counterparty".into(), Value::from(model.counterparty));
    doc.insert("instrument_id".into(), Value::from(model.instrument_id));
    doc.insert("instrument_name".into(), Value::from(model.instrument_name));
    doc.insert("trade_date_time".into(), Value::from(model.trade_date_time));
    doc.insert("trade_details".into(), Value::Object(details));
    doc.insert("trade_id".into(), Value::from(model.trade_id));
    doc.insert("trader".into(), Value::from(model.trader));
    doc
}

/// 로그에 비밀번호가 남지 않도록 사용자 정보 부분을 가린다.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
