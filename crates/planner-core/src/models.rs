use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A scheduled reminder row.
///
/// `date` is the 8-digit `YYYYMMDD` wire form and `repeat` is the raw rule
/// string; an empty `repeat` means a one-shot task. The integer id and the
/// date string format are the bit-exact contract shared with the API layer
/// and the persisted schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// Fields for inserting a new task; the store assigns the id.
#[derive(Debug, Clone, Default)]
pub struct NewTaskData {
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}
