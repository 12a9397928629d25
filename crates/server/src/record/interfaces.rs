use async_trait::async_trait;
use tradebook_model::{Document, SortSpec, TextQuery, Trade, TradePredicate};

/// skip/limit 구간. limit 이 0 이면 제한 없음.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl Page {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    /// 전체 결과
    pub fn all() -> Self {
        Self::default()
    }

    pub fn limit(&self) -> Option<u64> {
        (self.limit > 0).then_some(self.limit)
    }
}

/// 거래 저장소 게이트웨이
///
/// 검증은 하지 않는다. 쓰기 전/읽은 후 검증은 호출하는 쪽에서 `tradebook_model::validate` 로 한다.
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// 거래 저장
    async fn insert(&self, trade: &Trade) -> Result<(), StoreError>;

    /// 조건/정렬/구간으로 조회. 정렬이 없으면 저장 순서.
    async fn find(
        &self,
        predicate: &TradePredicate,
        sort: Option<SortSpec>,
        page: Page,
    ) -> Result<Vec<Document>, StoreError>;

    /// 자유 텍스트 검색
    async fn find_text(&self, query: &TextQuery) -> Result<Vec<Document>, StoreError>;

    /// 외부 거래 ID 로 첫 번째 문서 조회
    async fn find_one(&self, trade_id: &str) -> Result<Option<Document>, StoreError>;
}

/// 저장소 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Other error: {0}")]
    Other(String),
}
