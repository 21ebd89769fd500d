use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Response {
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    pub user_answer: Option<String>,
}

/// Response row joined with its question's correct answer.
#[derive(Debug, Clone, FromRow)]
pub struct GradedResponse {
    pub id: i64,
    pub question_id: i64,
    pub user_answer: Option<String>,
    pub correct_answer: String,
}

/// One line of the results report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub question_number: usize,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

impl ReportEntry {
    pub fn from_graded(position: usize, graded: GradedResponse) -> Self {
        let is_correct = graded.user_answer.as_deref() == Some(graded.correct_answer.as_str());
        Self {
            question_number: position + 1,
            user_answer: graded.user_answer,
            correct_answer: graded.correct_answer,
            is_correct,
        }
    }
}
