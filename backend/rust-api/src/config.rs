use serde::Deserialize;
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://questions.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8081";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: String,
    /// JSON chapter seed applied at startup, chapters already present by name are skipped.
    pub seed_file: Option<String>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Root .env first (two levels up), then local .env
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // config/*.toml + APP__ overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let database_url = settings
            .get_string("database.url")
            .or_else(|_| env::var("DATABASE_URL"))
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let database_max_connections = settings
            .get_int("database.max_connections")
            .ok()
            .and_then(|v| u32::try_from(v).ok())
            .or_else(|| {
                env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
            })
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let seed_file = settings
            .get_string("seed.file")
            .or_else(|_| env::var("SEED_FILE"))
            .ok()
            .filter(|path| !path.is_empty());

        let log_format = settings
            .get_string("logging.format")
            .or_else(|_| env::var("LOG_FORMAT"))
            .map(|v| LogFormat::parse(&v))
            .unwrap_or(LogFormat::Text);

        if app_env == "prod" && database_url.contains(":memory:") {
            tracing::warn!("In-memory database configured for prod; data will not survive restarts");
        }

        Ok(Config {
            database_url,
            database_max_connections,
            bind_addr,
            seed_file,
            log_format,
        })
    }

    /// Configuration for a throwaway in-memory database.
    pub fn in_memory() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            bind_addr: "127.0.0.1:0".to_string(),
            seed_file: None,
            log_format: LogFormat::Text,
        }
    }
}
