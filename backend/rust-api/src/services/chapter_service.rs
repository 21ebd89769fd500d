use sqlx::SqlitePool;

use super::QuizError;
use crate::metrics::track_db_operation;
use crate::models::{Chapter, Question};

pub struct ChapterService {
    pool: SqlitePool,
}

impl ChapterService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_chapters(&self) -> Result<Vec<Chapter>, QuizError> {
        let chapters = track_db_operation("select", "chapter", async {
            sqlx::query_as::<_, Chapter>(
                "SELECT id, name, total_questions FROM chapter ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await
        })
        .await?;

        tracing::debug!("Loaded {} chapters", chapters.len());
        Ok(chapters)
    }

    pub async fn get_chapter(&self, chapter_id: i64) -> Result<Chapter, QuizError> {
        track_db_operation("select", "chapter", async {
            sqlx::query_as::<_, Chapter>(
                "SELECT id, name, total_questions FROM chapter WHERE id = ?",
            )
            .bind(chapter_id)
            .fetch_optional(&self.pool)
            .await
        })
        .await?
        .ok_or(QuizError::ChapterNotFound(chapter_id))
    }

    /// Questions of a chapter in insertion order.
    pub async fn questions_for_chapter(&self, chapter_id: i64) -> Result<Vec<Question>, QuizError> {
        let questions = track_db_operation("select", "question", async {
            sqlx::query_as::<_, Question>(
                "SELECT id, chapter_id, correct_answer FROM question WHERE chapter_id = ? ORDER BY id",
            )
            .bind(chapter_id)
            .fetch_all(&self.pool)
            .await
        })
        .await?;

        Ok(questions)
    }

    pub async fn count_attempts(&self, chapter_id: i64) -> Result<i64, QuizError> {
        let count = track_db_operation("count", "attempt", async {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attempt WHERE chapter_id = ?")
                .bind(chapter_id)
                .fetch_one(&self.pool)
                .await
        })
        .await?;

        Ok(count)
    }
}
