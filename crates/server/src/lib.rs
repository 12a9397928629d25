pub mod config;
pub mod logger;
pub mod record;
pub mod server;

// 라이브러리 로드 시 .env 자동 반영
#[ctor::ctor]
fn load_dotenv() {
    dotenv::dotenv().ok();
}
