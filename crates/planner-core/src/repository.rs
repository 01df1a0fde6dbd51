//! Data access layer for tasks.
//!
//! Every operation is a single-row statement; there is no cross-task
//! transactional coupling, so row-level atomicity from SQLite is all the
//! concurrency control the store needs.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::date::format_date;
use crate::error::CoreError;
use crate::models::{NewTaskData, Task};
use crate::recurrence::next_occurrence;

/// Default number of rows returned by a listing when no limit is given.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Outcome of completing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    /// One-shot task, removed from the store.
    Deleted,
    /// Recurring task, rescheduled to the returned `YYYYMMDD` date.
    Rescheduled(String),
}

#[async_trait]
pub trait TaskRepository {
    async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError>;
    async fn find_task_by_id(&self, id: i64) -> Result<Task, CoreError>;
    async fn find_tasks(&self, limit: u32, search: Option<&str>) -> Result<Vec<Task>, CoreError>;
    async fn update_task(&self, task: &Task) -> Result<(), CoreError>;
    async fn update_date(&self, id: i64, date: &str) -> Result<(), CoreError>;
    async fn delete_task(&self, id: i64) -> Result<(), CoreError>;
    /// Completes a task: a one-shot task is deleted, a recurring one is
    /// rescheduled to its next occurrence after `today`.
    async fn complete_task(&self, id: i64, today: NaiveDate) -> Result<CompletionResult, CoreError>;
}

/// SQLite implementation of the task store.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteRepository {
    async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError> {
        let result =
            sqlx::query("INSERT INTO tasks (date, title, comment, repeat) VALUES (?, ?, ?, ?)")
                .bind(&data.date)
                .bind(&data.title)
                .bind(&data.comment)
                .bind(&data.repeat)
                .execute(&self.pool)
                .await?;
        Ok(Task {
            id: result.last_insert_rowid(),
            date: data.date,
            title: data.title,
            comment: data.comment,
            repeat: data.repeat,
        })
    }

    async fn find_task_by_id(&self, id: i64) -> Result<Task, CoreError> {
        sqlx::query_as::<_, Task>(
            "SELECT id, date, title, comment, repeat FROM tasks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    async fn find_tasks(&self, limit: u32, search: Option<&str>) -> Result<Vec<Task>, CoreError> {
        let limit = i64::from(limit);
        let tasks = match search.filter(|s| !s.is_empty()) {
            // A search in `DD.MM.YYYY` form matches the date column exactly;
            // anything else is a substring match over title and comment.
            Some(search) => match NaiveDate::parse_from_str(search, "%d.%m.%Y") {
                Ok(date) => {
                    sqlx::query_as::<_, Task>(
                        "SELECT id, date, title, comment, repeat FROM tasks \
                         WHERE date = ? ORDER BY date LIMIT ?",
                    )
                    .bind(format_date(date))
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
                }
                Err(_) => {
                    let pattern = format!("%{search}%");
                    sqlx::query_as::<_, Task>(
                        "SELECT id, date, title, comment, repeat FROM tasks \
                         WHERE title LIKE ? OR comment LIKE ? ORDER BY date LIMIT ?",
                    )
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
                }
            },
            None => {
                sqlx::query_as::<_, Task>(
                    "SELECT id, date, title, comment, repeat FROM tasks \
                     ORDER BY date LIMIT ?",
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(tasks)
    }

    async fn update_task(&self, task: &Task) -> Result<(), CoreError> {
        let result = sqlx::query(
            "UPDATE tasks SET date = ?, title = ?, comment = ?, repeat = ? WHERE id = ?",
        )
        .bind(&task.date)
        .bind(&task.title)
        .bind(&task.comment)
        .bind(&task.repeat)
        .bind(task.id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(task.id.to_string()));
        }
        Ok(())
    }

    async fn update_date(&self, id: i64, date: &str) -> Result<(), CoreError> {
        let result = sqlx::query("UPDATE tasks SET date = ? WHERE id = ?")
            .bind(date)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete_task(&self, id: i64) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn complete_task(&self, id: i64, today: NaiveDate) -> Result<CompletionResult, CoreError> {
        let task = self.find_task_by_id(id).await?;
        if task.repeat.is_empty() {
            self.delete_task(id).await?;
            Ok(CompletionResult::Deleted)
        } else {
            let next = next_occurrence(today, &task.date, &task.repeat)?;
            self.update_date(id, &next).await?;
            Ok(CompletionResult::Rescheduled(next))
        }
    }
}
