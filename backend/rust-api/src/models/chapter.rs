use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named group of questions. `total_questions` is declared at seed time
/// and is not recomputed from the `question` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Chapter {
    pub id: i64,
    pub name: String,
    pub total_questions: i64,
}

/// A multiple-choice item with a single-character answer code.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub chapter_id: i64,
    pub correct_answer: String,
}

impl Question {
    /// Form field carrying the answer to this question.
    pub fn field_name(&self) -> String {
        format!("q{}", self.id)
    }
}
