pub mod error;
pub mod field;
pub mod query;
pub mod schema;
pub mod sort;
pub mod text;

pub use error::ValidationError;
pub use field::TradeField;
pub use query::{build, Bounds, Condition, FieldCondition, Scalar, TradeFilter, TradePredicate};
pub use schema::{
    format_timestamp, parse_timestamp, validate, AssetClass, Document, Side, Trade, TradeDetails,
};
pub use sort::{resolve, SortDirection, SortSpec};
pub use text::{TextQuery, SEARCHABLE_FIELDS};
