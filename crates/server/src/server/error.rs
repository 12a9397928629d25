use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tradebook_model::ValidationError;

use crate::record::StoreError;

/// API 에러. 분류마다 다른 상태 코드로 응답한다.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 요청 본문/파라미터 검증 실패
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// 단건 조회 실패
    #[error("Trade with id {trade_id} does not exist")]
    NotFound { trade_id: String },

    /// 저장된 문서가 재검증을 통과하지 못함
    #[error("stored trade failed validation: {0}")]
    CorruptRecord(ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": "validation_failed",
                    "field": e.field(),
                    "detail": e.to_string(),
                })),
            )
                .into_response(),
            // 호환을 위해 본문은 안내 문장 그대로 유지
            ApiError::NotFound { trade_id } => (
                StatusCode::NOT_FOUND,
                Json(format!("Trade with id {} does not exist", trade_id)),
            )
                .into_response(),
            ApiError::CorruptRecord(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "corrupt_record",
                    "field": e.field(),
                    "detail": e.to_string(),
                })),
            )
                .into_response(),
            ApiError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "store_unavailable" })),
            )
                .into_response(),
        }
    }
}
