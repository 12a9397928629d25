use std::sync::Arc;

use color_eyre::eyre;
use structopt::StructOpt;
use tracing::info;

use tradebook::config::{self, Config};
use tradebook::record::SqlTradeStore;
use tradebook::server::{self, AppState};

// lib.rs에서 자동으로 dotenv가 로드됨

/// 명령행 인자는 같은 이름의 환경 변수보다 우선한다.
#[derive(Debug, StructOpt)]
#[structopt(name = "tradebook", about = "거래 기록 API 서버")]
struct Opt {
    /// 저장소 연결 문자열 (DATABASE_URL)
    #[structopt(long)]
    database_url: Option<String>,

    /// 바인드 주소 (TRADE_API_HOST)
    #[structopt(long)]
    host: Option<String>,

    /// 포트 (TRADE_API_PORT)
    #[structopt(long)]
    port: Option<u16>,
}

impl Opt {
    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            config::DATABASE_URL => self.database_url.clone(),
            config::API_HOST => self.host.clone(),
            config::API_PORT => self.port.map(|p| p.to_string()),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // init error reporting
    color_eyre::install()?;

    let opt = Opt::from_args();

    let config = Config::from_lookup(|key| opt.lookup(key).or_else(|| std::env::var(key).ok()))
        .map_err(|e| eyre::eyre!("설정 로드 실패: {}", e))?;

    // init logging
    let _guards = tradebook::logger::init_tracing(config.log_dir.as_deref());

    let store = SqlTradeStore::connect(&config.database_url)
        .await
        .map_err(|e| eyre::eyre!("거래 저장소 초기화 실패: {}", e))?;

    let state = AppState::new(Arc::new(store));

    info!("API 서버를 {}에서 시작합니다", config.bind_addr());

    server::start_server(&config.bind_addr(), state).await?;

    info!("API 서버가 종료되었습니다");

    Ok(())
}
