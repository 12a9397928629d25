pub mod entities;
pub mod interfaces;
pub mod sql;

pub use interfaces::{Page, StoreError, TradeStore};
pub use sql::SqlTradeStore;
