use std::collections::HashMap;

use sqlx::SqlitePool;

use super::QuizError;
use crate::metrics::{track_db_operation, ANSWERS_SUBMITTED_TOTAL};
use crate::models::{Attempt, Question};

/// Answer recorded for one question before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedAnswer {
    pub question_id: i64,
    pub user_answer: Option<String>,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grading {
    pub score: i64,
    pub answers: Vec<GradedAnswer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Scored { score: i64, responses: usize },
    /// The attempt already had a score; nothing was written.
    AlreadyScored,
}

/// Grades submitted form fields (`q{question_id}` → answer code) against the
/// questions. Comparison is exact and case-sensitive; a missing or empty field
/// counts as unanswered. Exactly one graded answer is produced per question.
pub fn grade(questions: &[Question], form: &HashMap<String, String>) -> Grading {
    let answers: Vec<GradedAnswer> = questions
        .iter()
        .map(|question| {
            let user_answer = form
                .get(&question.field_name())
                .filter(|value| !value.is_empty())
                .cloned();
            let correct = user_answer.as_deref() == Some(question.correct_answer.as_str());
            GradedAnswer {
                question_id: question.id,
                user_answer,
                correct,
            }
        })
        .collect();

    let score = answers.iter().filter(|answer| answer.correct).count() as i64;

    Grading { score, answers }
}

pub struct AnswerService {
    pool: SqlitePool,
}

impl AnswerService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Scores an attempt and stores one response per question in a single
    /// transaction. The score is claimed first so a second submission for the
    /// same attempt writes nothing.
    pub async fn submit_answers(
        &self,
        attempt: &Attempt,
        questions: &[Question],
        form: &HashMap<String, String>,
    ) -> Result<SubmissionOutcome, QuizError> {
        if attempt.is_scored() {
            tracing::warn!(
                "Attempt {} already scored, ignoring resubmission",
                attempt.id
            );
            return Ok(SubmissionOutcome::AlreadyScored);
        }

        let grading = grade(questions, form);

        let outcome = track_db_operation("submit", "response", async {
            let mut tx = self.pool.begin().await?;

            let claimed = sqlx::query("UPDATE attempt SET score = ? WHERE id = ? AND score IS NULL")
                .bind(grading.score)
                .bind(attempt.id)
                .execute(&mut *tx)
                .await?;

            if claimed.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok::<_, sqlx::Error>(SubmissionOutcome::AlreadyScored);
            }

            for answer in &grading.answers {
                sqlx::query(
                    "INSERT INTO response (attempt_id, question_id, user_answer) VALUES (?, ?, ?)",
                )
                .bind(attempt.id)
                .bind(answer.question_id)
                .bind(answer.user_answer.as_deref())
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;

            Ok(SubmissionOutcome::Scored {
                score: grading.score,
                responses: grading.answers.len(),
            })
        })
        .await?;

        match outcome {
            SubmissionOutcome::Scored { score, responses } => {
                let correct = score as u64;
                ANSWERS_SUBMITTED_TOTAL
                    .with_label_values(&["true"])
                    .inc_by(correct);
                ANSWERS_SUBMITTED_TOTAL
                    .with_label_values(&["false"])
                    .inc_by(responses as u64 - correct);
                tracing::info!(
                    "Attempt {} scored {}/{} (chapter {})",
                    attempt.id,
                    score,
                    responses,
                    attempt.chapter_id
                );
            }
            SubmissionOutcome::AlreadyScored => {
                tracing::warn!(
                    "Attempt {} lost scoring race, submission discarded",
                    attempt.id
                );
            }
        }

        Ok(outcome)
    }
}
