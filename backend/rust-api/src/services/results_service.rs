use serde::Serialize;
use sqlx::SqlitePool;

use super::{
    attempt_service::AttemptService, chapter_service::ChapterService, QuizError,
};
use crate::metrics::track_db_operation;
use crate::models::{Attempt, Chapter, GradedResponse, ReportEntry};

#[derive(Debug, Clone, Serialize)]
pub struct ResultsReport {
    pub attempt: Attempt,
    pub chapter: Chapter,
    pub entries: Vec<ReportEntry>,
    pub total_questions: i64,
}

pub struct ResultsService {
    pool: SqlitePool,
}

impl ResultsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Builds the report for an attempt. Entries follow response storage order
    /// and are numbered from 1. Read-only.
    pub async fn report(&self, attempt_id: i64) -> Result<ResultsReport, QuizError> {
        let attempt = AttemptService::new(self.pool.clone())
            .get_attempt(attempt_id)
            .await?;
        let chapter = ChapterService::new(self.pool.clone())
            .get_chapter(attempt.chapter_id)
            .await?;

        let graded = track_db_operation("select", "response", async {
            sqlx::query_as::<_, GradedResponse>(
                r#"
                SELECT r.id, r.question_id, r.user_answer, q.correct_answer
                FROM response r
                JOIN question q ON q.id = r.question_id
                WHERE r.attempt_id = ?
                ORDER BY r.id
                "#,
            )
            .bind(attempt_id)
            .fetch_all(&self.pool)
            .await
        })
        .await?;

        let entries: Vec<ReportEntry> = graded
            .into_iter()
            .enumerate()
            .map(|(position, row)| ReportEntry::from_graded(position, row))
            .collect();

        tracing::debug!(
            "Built report for attempt {} with {} entries",
            attempt_id,
            entries.len()
        );

        Ok(ResultsReport {
            total_questions: chapter.total_questions,
            attempt,
            chapter,
            entries,
        })
    }
}
