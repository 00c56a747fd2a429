use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{Task, TaskFilter};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

pub mod tasks;

/// Storage capability for tasks.
///
/// The lifecycle layer only talks to storage through this trait, so any
/// backend (or a test double) can be injected.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert_task(&self, task: &Task) -> Result<(), CoreError>;
    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError>;
    async fn find_tasks_by_short_id_prefix(&self, short_id: &str) -> Result<Vec<Task>, CoreError>;
    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, CoreError>;
    /// Overwrites every mutable field of an existing task.
    async fn update_task(&self, task: &Task) -> Result<(), CoreError>;
    /// Moves a task to `next` only if it is still scheduled on `expected`.
    /// Returns `false` when no row matched.
    async fn reschedule_task(
        &self,
        id: Uuid,
        expected: NaiveDate,
        next: NaiveDate,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, CoreError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError>;
    /// Deletes a task only if it has no recurrence directive.
    /// Returns `false` when no row matched.
    async fn delete_one_shot_task(&self, id: Uuid) -> Result<bool, CoreError>;
}

/// SQLite implementation of the repository pattern
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}
