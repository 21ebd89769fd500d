use crate::config::Config;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub mod answer_service;
pub mod attempt_service;
pub mod chapter_service;
pub mod results_service;
pub mod seed_service;

pub struct AppState {
    pub config: Config,
    pub pool: SqlitePool,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        tracing::info!("Opening SQLite pool at {}", config.database_url);

        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true);

        // An in-memory database lives only as long as its connection, so the
        // pool must never recycle it.
        let pool = SqlitePoolOptions::new()
            .max_connections(config.database_max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self { config, pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Chapter {0} not found")]
    ChapterNotFound(i64),
    #[error("Attempt {0} not found")]
    AttemptNotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl QuizError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            QuizError::ChapterNotFound(_) | QuizError::AttemptNotFound(_)
        )
    }
}
