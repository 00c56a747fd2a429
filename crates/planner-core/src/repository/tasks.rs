use crate::date;
use crate::error::CoreError;
use crate::models::{Task, TaskFilter};
use crate::repository::{SqliteRepository, TaskRepository};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::QueryBuilder;
use tracing::debug;
use uuid::Uuid;

/// Escapes LIKE wildcards so user input is matched literally.
/// Pair with `ESCAPE '\'` in the query.
fn escape_like(term: &str, pattern: &mut String) {
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
}

/// `%term%`, matching `term` anywhere.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    escape_like(term, &mut pattern);
    pattern.push('%');
    pattern
}

/// `prefix%`, matching `prefix` at the start.
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    escape_like(prefix, &mut pattern);
    pattern.push('%');
    pattern
}

#[async_trait]
impl TaskRepository for SqliteRepository {
    async fn insert_task(&self, task: &Task) -> Result<(), CoreError> {
        sqlx::query(
            r#"INSERT INTO tasks (id, date, title, comment, directive, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(task.id.to_string())
        .bind(date::format(task.date))
        .bind(&task.title)
        .bind(&task.comment)
        .bind(task.directive.as_deref().unwrap_or(""))
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(self.pool())
        .await?;

        debug!(id = %task.id, "inserted task");
        Ok(())
    }

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    async fn find_tasks_by_short_id_prefix(&self, short_id: &str) -> Result<Vec<Task>, CoreError> {
        let tasks: Vec<Task> =
            sqlx::query_as("SELECT * FROM tasks WHERE id LIKE ? ESCAPE '\\' ORDER BY date")
                .bind(prefix_pattern(&short_id.to_lowercase()))
                .fetch_all(self.pool())
                .await?;
        Ok(tasks)
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, CoreError> {
        let mut query_builder: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new("SELECT * FROM tasks WHERE 1 = 1");

        if let Some(from) = filter.from {
            query_builder.push(" AND date >= ");
            query_builder.push_bind(date::format(from));
        }

        if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
            let pattern = like_pattern(term);
            query_builder.push(" AND (title LIKE ");
            query_builder.push_bind(pattern.clone());
            query_builder.push(" ESCAPE '\\' OR comment LIKE ");
            query_builder.push_bind(pattern);
            query_builder.push(" ESCAPE '\\')");
        }

        query_builder.push(" ORDER BY date ASC, created_at ASC LIMIT ");
        query_builder.push_bind(i64::from(filter.limit));

        let tasks = query_builder.build_query_as().fetch_all(self.pool()).await?;
        Ok(tasks)
    }

    async fn update_task(&self, task: &Task) -> Result<(), CoreError> {
        let result = sqlx::query(
            r#"UPDATE tasks
            SET date = $1, title = $2, comment = $3, directive = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(date::format(task.date))
        .bind(&task.title)
        .bind(&task.comment)
        .bind(task.directive.as_deref().unwrap_or(""))
        .bind(task.updated_at)
        .bind(task.id.to_string())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(task.id.to_string()));
        }
        debug!(id = %task.id, "updated task");
        Ok(())
    }

    async fn reschedule_task(
        &self,
        id: Uuid,
        expected: NaiveDate,
        next: NaiveDate,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, CoreError> {
        let result = sqlx::query(
            r#"UPDATE tasks
            SET date = $1, updated_at = $2
            WHERE id = $3 AND date = $4
            "#,
        )
        .bind(date::format(next))
        .bind(updated_at)
        .bind(id.to_string())
        .bind(date::format(expected))
        .execute(self.pool())
        .await?;

        debug!(%id, rows = result.rows_affected(), "rescheduled task");
        Ok(result.rows_affected() > 0)
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id.to_string())
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete_one_shot_task(&self, id: Uuid) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND directive = ''")
            .bind(id.to_string())
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
