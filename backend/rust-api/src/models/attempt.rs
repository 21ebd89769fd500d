use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Attempt {
    pub id: i64,
    pub chapter_id: i64,
    pub attempt_number: i64,
    pub timestamp: DateTime<Utc>,
    /// `None` until answers have been submitted.
    pub score: Option<i64>,
}

impl Attempt {
    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }
}
