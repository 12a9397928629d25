use thiserror::Error;

/// 거래 레코드 검증 실패
///
/// 모든 variant 는 문제가 된 필드 경로(내부 이름, 예: `trade_details.price`)를 가진다.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("`{field}` must be a JSON object")]
    NotAnObject { field: &'static str },

    #[error("`{field}` is required")]
    Missing { field: &'static str },

    #[error("`{field}` must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("`{field}` is not a valid date-time: {value}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("`{field}` must be one of {allowed}, got {value}")]
    InvalidVariant {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error("`{field}` must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("`{field}` must be a finite number")]
    NotFinite { field: &'static str },

    #[error("`{field}` could not be read: {detail}")]
    Malformed { field: &'static str, detail: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NotAnObject { field }
            | ValidationError::Missing { field }
            | ValidationError::InvalidType { field, .. }
            | ValidationError::InvalidTimestamp { field, .. }
            | ValidationError::InvalidVariant { field, .. }
            | ValidationError::NotPositive { field }
            | ValidationError::NotFinite { field }
            | ValidationError::Malformed { field, .. } => field,
        }
    }
}
