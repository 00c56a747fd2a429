use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use crate::date;
use crate::error::ValidationError;
use crate::recurrence::{self, RecurrenceRule};

/// Default number of tasks returned by a listing.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: Uuid,
    /// Next scheduled occurrence.
    #[serde(with = "date::wire")]
    pub date: NaiveDate,
    pub title: String,
    pub comment: Option<String>,
    /// Recurrence directive; `None` for one-shot tasks.
    pub directive: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Parses the stored directive, if any.
    pub fn rule(&self) -> Result<Option<RecurrenceRule>, ValidationError> {
        self.directive.as_deref().map(recurrence::parse).transpose()
    }

    pub fn is_recurring(&self) -> bool {
        self.directive.is_some()
    }
}

// Ids and dates are stored as TEXT so that short-id prefixes can be matched
// with LIKE and dates sort lexicographically.
impl<'r> FromRow<'r, SqliteRow> for Task {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let id = Uuid::parse_str(&id).map_err(|e| sqlx::Error::ColumnDecode {
            index: "id".to_string(),
            source: Box::new(e),
        })?;

        let date: String = row.try_get("date")?;
        let date = date::parse(&date).map_err(|e| sqlx::Error::ColumnDecode {
            index: "date".to_string(),
            source: Box::new(e),
        })?;

        let comment: Option<String> = row.try_get("comment")?;
        let directive: String = row.try_get("directive")?;

        Ok(Task {
            id,
            date,
            title: row.try_get("title")?,
            comment: comment.filter(|c| !c.is_empty()),
            directive: Some(directive).filter(|d| !d.is_empty()),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Raw input for creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTaskData {
    pub title: String,
    /// `YYYYMMDD`; missing or empty means today.
    pub date: Option<String>,
    pub comment: Option<String>,
    /// Recurrence directive; missing or blank means one-shot.
    pub directive: Option<String>,
}

/// Partial edit of an existing task. `None` leaves a field unchanged;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskData {
    pub title: Option<String>,
    /// `YYYYMMDD`; an empty string means today.
    pub date: Option<String>,
    pub comment: Option<Option<String>>,
    pub directive: Option<Option<String>>,
}

impl UpdateTaskData {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.comment.is_none()
            && self.directive.is_none()
    }
}

#[derive(Debug)]
pub enum CompletionResult {
    /// A one-shot task was completed and deleted.
    Removed(Task),
    /// A recurring task was moved to its next occurrence.
    Rescheduled { task: Task, previous_date: NaiveDate },
}

/// Listing query.
#[derive(Debug, Clone)]
pub struct TaskFilter {
    /// Only tasks scheduled on or after this date.
    pub from: Option<NaiveDate>,
    /// Case-insensitive substring of title or comment.
    pub search: Option<String>,
    pub limit: u32,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            from: None,
            search: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}
