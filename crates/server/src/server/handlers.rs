use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};
use tradebook_model::{
    self as model, AssetClass, Document, Side, SortSpec, TextQuery, Trade, TradeField,
    TradeFilter, TradePredicate, ValidationError,
};

use super::error::ApiError;
use super::AppState;
use crate::record::Page;

pub const WELCOME: &str =
    "Welcome to the trade record API. Browse recorded trades at /trades/list";

const DEFAULT_LIMIT: u64 = 10;

// ============================================================================
// 요청/응답 타입
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    #[serde(rename = "tradeId")]
    pub trade_id: Option<String>,
}

/// 쿼리 파라미터는 문자열로 받아 직접 해석한다. 실패는 파라미터 이름과 함께 422 로 응답한다.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub skip: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl ListParams {
    pub fn page(&self) -> Result<Page, ValidationError> {
        let skip = count(self.skip.as_deref(), "skip")?.unwrap_or(0);
        let limit = count(self.limit.as_deref(), "limit")?.unwrap_or(DEFAULT_LIMIT);
        Ok(Page::new(skip, limit))
    }

    pub fn sort(&self) -> Result<Option<SortSpec>, ValidationError> {
        let field = variant(self.sort.as_deref(), "sort", TradeField::ALLOWED)?;
        let direction = variant(self.order.as_deref(), "order", "Asc, Des")?;
        Ok(model::resolve(field, direction))
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub asset_class: Option<String>,
    pub end: Option<String>,
    pub max_price: Option<String>,
    pub min_price: Option<String>,
    pub start: Option<String>,
    pub trade_type: Option<String>,
}

impl FilterParams {
    /// 쿼리 파라미터를 필터로 변환. 주어진 값은 0 이어도 유효한 경계로 본다.
    pub fn into_filter(self) -> Result<TradeFilter, ValidationError> {
        Ok(TradeFilter {
            asset_class: variant::<AssetClass>(
                self.asset_class.as_deref(),
                "assetClass",
                "Bond, FX, Equity, Crypto",
            )?,
            trade_type: variant::<Side>(self.trade_type.as_deref(), "tradeType", "BUY, SELL")?,
            min_price: price(self.min_price.as_deref(), "minPrice")?,
            max_price: price(self.max_price.as_deref(), "maxPrice")?,
            start: bound_timestamp(self.start.as_deref(), "start")?,
            end: bound_timestamp(self.end.as_deref(), "end")?,
        })
    }
}

fn variant<T: FromStr>(
    raw: Option<&str>,
    field: &'static str,
    allowed: &'static str,
) -> Result<Option<T>, ValidationError> {
    raw.map(|s| {
        s.parse::<T>().map_err(|_| ValidationError::InvalidVariant {
            field,
            value: s.to_string(),
            allowed,
        })
    })
    .transpose()
}

fn count(raw: Option<&str>, field: &'static str) -> Result<Option<u64>, ValidationError> {
    raw.map(|s| {
        s.trim().parse::<u64>().map_err(|_| ValidationError::InvalidType {
            field,
            expected: "a non-negative integer",
        })
    })
    .transpose()
}

fn price(raw: Option<&str>, field: &'static str) -> Result<Option<f64>, ValidationError> {
    let Some(s) = raw else { return Ok(None) };
    let value = s.trim().parse::<f64>().map_err(|_| ValidationError::InvalidType {
        field,
        expected: "a number",
    })?;
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    Ok(Some(value))
}

fn bound_timestamp(
    raw: Option<&str>,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    raw.map(|s| {
        model::parse_timestamp(s).ok_or_else(|| ValidationError::InvalidTimestamp {
            field,
            value: s.to_string(),
        })
    })
    .transpose()
}

fn rejected(e: ValidationError) -> ValidationError {
    warn!(field = e.field(), "Rejected request parameters: {}", e);
    e
}

// ============================================================================
// 핸들러
// ============================================================================

pub async fn home() -> &'static str {
    WELCOME
}

#[instrument(skip_all)]
pub async fn create_trade(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let Json(body) = body
        .map_err(|rejection| ValidationError::Malformed {
            field: "body",
            detail: rejection.body_text(),
        })
        .map_err(rejected)?;
    let trade = model::validate(&body).map_err(rejected)?;

    state.store.insert(&trade).await?;

    info!(
        trade_id = ?trade.trade_id,
        instrument_id = %trade.instrument_id,
        "Trade recorded"
    );

    Ok(Json(CreatedResponse {
        message: "Trade created successfully",
        trade_id: trade.trade_id,
    }))
}

#[instrument(skip(state))]
pub async fn list_trades(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Trade>>, ApiError> {
    let sort = params.sort().map_err(rejected)?;
    let page = params.page().map_err(rejected)?;

    let documents = state
        .store
        .find(&TradePredicate::new(), sort, page)
        .await?;

    shape(documents).map(Json)
}

#[instrument(skip(state))]
pub async fn search_trades(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Trade>>, ApiError> {
    let text = TextQuery::parse(params.search.as_deref().unwrap_or_default());

    let documents = state.store.find_text(&text).await?;

    shape(documents).map(Json)
}

#[instrument(skip(state))]
pub async fn filter_trades(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Trade>>, ApiError> {
    let filter = params.into_filter().map_err(rejected)?;
    let predicate = model::build(&filter);

    info!(filter = %predicate.to_document(), "Filtering trades");

    let documents = state.store.find(&predicate, None, Page::all()).await?;

    shape(documents).map(Json)
}

#[instrument(skip(state))]
pub async fn get_trade(
    State(state): State<AppState>,
    Path(trade_id): Path<String>,
) -> Result<Json<Trade>, ApiError> {
    match state.store.find_one(&trade_id).await? {
        Some(document) => shape_one(document).map(Json),
        None => Err(ApiError::NotFound { trade_id }),
    }
}

// ============================================================================
// 결과 재검증
// ============================================================================

fn shape(documents: Vec<Document>) -> Result<Vec<Trade>, ApiError> {
    documents.into_iter().map(shape_one).collect()
}

/// 저장소에서 읽은 문서도 쓰기와 같은 검증을 거친다. 실패는 서버 에러로 드러낸다.
fn shape_one(document: Document) -> Result<Trade, ApiError> {
    let raw = Value::Object(document);
    model::validate(&raw).map_err(|e| {
        error!(document = %raw, "Stored trade failed validation: {}", e);
        ApiError::CorruptRecord(e)
    })
}
