use std::path::PathBuf;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const API_HOST: &str = "TRADE_API_HOST";
pub const API_PORT: &str = "TRADE_API_PORT";
pub const LOG_DIR: &str = "TRADE_LOG_DIR";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// 실행 설정
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// 저장소 연결 문자열 (필수)
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// 지정하면 일 단위 로그 파일도 남긴다
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    /// 키 조회 함수로 설정을 만든다. `main` 은 CLI 인자 다음에 환경 변수를 본다.
    /// `.env` 는 라이브러리 로드 시 이미 환경에 반영되어 있다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get(DATABASE_URL).ok_or(ConfigError::Missing(DATABASE_URL))?;

        let host = get(API_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get(API_PORT) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: API_PORT,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let log_dir = get(LOG_DIR).map(PathBuf::from);

        Ok(Self {
            database_url,
            host,
            port,
            log_dir,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
