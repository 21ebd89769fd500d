use chrono::Utc;
use sqlx::SqlitePool;
use std::future::Future;

use super::QuizError;
use crate::metrics::{track_db_operation, ATTEMPTS_STARTED_TOTAL};
use crate::models::Attempt;
use crate::utils::retry::{retry_async_when, RetryConfig};

pub struct AttemptService {
    pool: SqlitePool,
}

impl AttemptService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the next attempt for a chapter. The caller is expected to have
    /// checked that the chapter exists.
    ///
    /// Reading the highest number and inserting are separate statements. The
    /// unique `(chapter_id, attempt_number)` index rejects a number taken by a
    /// concurrent start in between, and the start is retried with a fresh read.
    pub async fn start_attempt(&self, chapter_id: i64) -> Result<Attempt, QuizError> {
        self.start_attempt_numbered_by(chapter_id, move || self.next_attempt_number(chapter_id))
            .await
    }

    pub async fn get_attempt(&self, attempt_id: i64) -> Result<Attempt, QuizError> {
        track_db_operation("select", "attempt", async {
            sqlx::query_as::<_, Attempt>(
                "SELECT id, chapter_id, attempt_number, timestamp, score FROM attempt WHERE id = ?",
            )
            .bind(attempt_id)
            .fetch_optional(&self.pool)
            .await
        })
        .await?
        .ok_or(QuizError::AttemptNotFound(attempt_id))
    }

    async fn start_attempt_numbered_by<F, Fut>(
        &self,
        chapter_id: i64,
        mut next_number: F,
    ) -> Result<Attempt, QuizError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<i64, sqlx::Error>>,
    {
        let attempt = retry_async_when(
            RetryConfig::default(),
            move || {
                let number = next_number();
                async move {
                    let attempt_number = number.await?;
                    self.insert_attempt(chapter_id, attempt_number).await
                }
            },
            is_unique_violation,
        )
        .await?;

        ATTEMPTS_STARTED_TOTAL.inc();
        tracing::info!(
            "Attempt {} created for chapter {} (attempt #{})",
            attempt.id,
            chapter_id,
            attempt.attempt_number
        );

        Ok(attempt)
    }

    async fn next_attempt_number(&self, chapter_id: i64) -> Result<i64, sqlx::Error> {
        track_db_operation("select", "attempt", async {
            sqlx::query_scalar::<_, i64>(
                "SELECT COALESCE(MAX(attempt_number), 0) + 1 FROM attempt WHERE chapter_id = ?",
            )
            .bind(chapter_id)
            .fetch_one(&self.pool)
            .await
        })
        .await
    }

    async fn insert_attempt(
        &self,
        chapter_id: i64,
        attempt_number: i64,
    ) -> Result<Attempt, sqlx::Error> {
        let result = track_db_operation("insert", "attempt", async {
            sqlx::query_as::<_, Attempt>(
                r#"
                INSERT INTO attempt (chapter_id, attempt_number, timestamp, score)
                VALUES (?, ?, ?, NULL)
                RETURNING id, chapter_id, attempt_number, timestamp, score
                "#,
            )
            .bind(chapter_id)
            .bind(attempt_number)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
        })
        .await;

        if let Err(e) = &result {
            if is_unique_violation(e) {
                tracing::warn!(
                    "Attempt #{} for chapter {} already taken, renumbering",
                    attempt_number,
                    chapter_id
                );
            }
        }

        result
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
