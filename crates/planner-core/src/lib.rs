//! # Planner Core Library
//!
//! Recurrence engine and task lifecycle for the Planner scheduler.
//!
//! A task carries one calendar date (its next occurrence) and an optional
//! recurrence directive: `y` (yearly) or `d <n>` (every `n` days,
//! `1 <= n <= 366`). When a task is created, edited or completed, the
//! lifecycle layer decides whether its date is stale and advances it with
//! the recurrence engine.
//!
//! ## Core Modules
//!
//! - [`recurrence`]: directive parser and date advancer (pure, no I/O)
//! - [`date`]: the `YYYYMMDD` wire format
//! - [`lifecycle`]: create/edit/complete policy over an injected repository
//! - [`repository`]: storage trait and its SQLite implementation
//! - [`db`]: connection pool and migrations
//! - [`models`]: tasks and transfer objects
//! - [`error`]: error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use planner_core::{
//!     db, lifecycle::TaskService, models::NewTaskData, repository::SqliteRepository,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("scheduler.db").await?;
//!     let service = TaskService::new(SqliteRepository::new(pool));
//!
//!     let task = service
//!         .create_task(NewTaskData {
//!             title: "Water the plants".to_string(),
//!             directive: Some("d 3".to_string()),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Next due {}", planner_core::date::format(task.date));
//!
//!     Ok(())
//! }
//! ```

pub mod date;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod recurrence;
pub mod repository;
