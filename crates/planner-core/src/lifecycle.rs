//! Task lifecycle policy: decides when a stored date is stale and must be
//! advanced through the recurrence engine.
//!
//! | Operation | Policy |
//! |-----------|--------|
//! | create    | missing date is today; a past date is advanced past today by the directive, or reset to today for one-shot tasks |
//! | edit      | the same policy, applied to the merged task |
//! | complete  | one-shot tasks are deleted; recurring tasks move to the first occurrence on or after today, stepping from their stored date |

use chrono::{Local, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::date;
use crate::error::CoreError;
use crate::models::{CompletionResult, NewTaskData, Task, TaskFilter, UpdateTaskData};
use crate::recurrence::{self, RecurrenceRule};
use crate::repository::TaskRepository;

/// Source of "today".
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The local calendar day of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Validated schedule for a task: its date and normalized directive.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schedule {
    date: NaiveDate,
    directive: Option<String>,
}

pub struct TaskService<R, C = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: TaskRepository> TaskService<R, SystemClock> {
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: TaskRepository, C: Clock> TaskService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Creates a task, applying the staleness policy to its date.
    pub async fn create_task(&self, data: NewTaskData) -> Result<Task, CoreError> {
        let title = validate_title(&data.title)?;
        let schedule = self.schedule(data.date.as_deref(), data.directive.as_deref())?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::now_v7(),
            date: schedule.date,
            title,
            comment: normalize_optional(data.comment),
            directive: schedule.directive,
            created_at: now,
            updated_at: now,
        };

        self.repo.insert_task(&task).await?;
        info!(id = %task.id, date = %date::format(task.date), "created task");
        Ok(task)
    }

    /// Applies a partial edit and revalidates the resulting schedule.
    pub async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError> {
        let mut task = self.get_task(id).await?;

        if let Some(title) = data.title {
            task.title = validate_title(&title)?;
        }
        if let Some(comment) = data.comment {
            task.comment = normalize_optional(comment);
        }

        let date = data.date.unwrap_or_else(|| date::format(task.date));
        let directive = match data.directive {
            Some(directive) => directive,
            None => task.directive.clone(),
        };
        let schedule = self.schedule(Some(&date), directive.as_deref())?;

        task.date = schedule.date;
        task.directive = schedule.directive;
        task.updated_at = Utc::now();

        self.repo.update_task(&task).await?;
        info!(id = %task.id, date = %date::format(task.date), "updated task");
        Ok(task)
    }

    /// Marks a task done.
    ///
    /// One-shot tasks are deleted. Recurring tasks advance from their stored
    /// date to the first occurrence on or after today; the write only
    /// succeeds if the stored date is unchanged, otherwise
    /// [`CoreError::Conflict`] is returned.
    pub async fn complete_task(&self, id: Uuid) -> Result<CompletionResult, CoreError> {
        let task = self.get_task(id).await?;

        let Some(rule) = task.rule()? else {
            if !self.repo.delete_one_shot_task(task.id).await? {
                return Err(CoreError::Conflict(task.id.to_string()));
            }
            info!(id = %task.id, "completed one-shot task, removed");
            return Ok(CompletionResult::Removed(task));
        };

        let today = self.clock.today();
        let previous_date = task.date;
        let next = advance(rule, previous_date, today)?;
        let updated_at = Utc::now();

        if !self
            .repo
            .reschedule_task(task.id, previous_date, next, updated_at)
            .await?
        {
            return Err(CoreError::Conflict(task.id.to_string()));
        }

        info!(
            id = %task.id,
            from = %date::format(previous_date),
            to = %date::format(next),
            "completed recurring task, rescheduled"
        );
        Ok(CompletionResult::Rescheduled {
            task: Task {
                date: next,
                updated_at,
                ..task
            },
            previous_date,
        })
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), CoreError> {
        self.repo.delete_task(id).await?;
        info!(%id, "deleted task");
        Ok(())
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task, CoreError> {
        self.repo
            .find_task_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, CoreError> {
        self.repo.find_tasks(filter).await
    }

    /// Resolves a full id or a unique prefix of at least two characters.
    pub async fn resolve_task_id(&self, short_id: &str) -> Result<Uuid, CoreError> {
        if let Ok(id) = Uuid::parse_str(short_id) {
            return Ok(id);
        }
        if short_id.len() < 2 {
            return Err(CoreError::InvalidInput(
                "Short ID must be at least 2 characters long.".to_string(),
            ));
        }

        let mut tasks = self.repo.find_tasks_by_short_id_prefix(short_id).await?;
        match tasks.len() {
            0 => Err(CoreError::NotFound(format!("no task with ID prefix '{}'", short_id))),
            1 => Ok(tasks.remove(0).id),
            _ => Err(CoreError::AmbiguousId(
                tasks
                    .into_iter()
                    .map(|t| (t.id.to_string(), t.title))
                    .collect(),
            )),
        }
    }

    /// Validates a date/directive pair and applies the staleness policy.
    fn schedule(&self, date: Option<&str>, directive: Option<&str>) -> Result<Schedule, CoreError> {
        let today = self.clock.today();

        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => date::parse(d)?,
            None => today,
        };

        let rule = directive
            .filter(|d| !d.trim().is_empty())
            .map(recurrence::parse)
            .transpose()?;

        let date = match rule {
            _ if date >= today => date,
            Some(rule) => {
                let next = advance(rule, date, today)?;
                debug!(from = %date::format(date), to = %date::format(next), "advanced stale date");
                next
            }
            None => {
                debug!(from = %date::format(date), "reset stale one-shot date to today");
                today
            }
        };

        // Directives are stored in canonical form (`d 7`, not `d   07`).
        Ok(Schedule {
            date,
            directive: rule.map(|r| r.to_string()),
        })
    }
}

fn advance(rule: RecurrenceRule, from: NaiveDate, today: NaiveDate) -> Result<NaiveDate, CoreError> {
    recurrence::next_occurrence(rule, from, today)
        .ok_or_else(|| CoreError::DateOutOfRange(date::format(from)))
}

fn validate_title(title: &str) -> Result<String, CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::InvalidInput("Task title must not be empty".to_string()));
    }
    Ok(title.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::establish_in_memory;
    use crate::error::ValidationError;
    use crate::repository::SqliteRepository;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn service(today: NaiveDate) -> TaskService<SqliteRepository, FixedClock> {
        let repo = SqliteRepository::new(establish_in_memory().await.unwrap());
        TaskService::with_clock(repo, FixedClock(today))
    }

    fn new_task(title: &str, date: Option<&str>, directive: Option<&str>) -> NewTaskData {
        NewTaskData {
            title: title.to_string(),
            date: date.map(String::from),
            comment: None,
            directive: directive.map(String::from),
        }
    }

    mod create_tests {
        use super::*;

        #[tokio::test]
        async fn test_missing_date_defaults_to_today() {
            let service = service(ymd(2024, 6, 1)).await;
            let task = service.create_task(new_task("Read", None, None)).await.unwrap();
            assert_eq!(task.date, ymd(2024, 6, 1));

            let task = service.create_task(new_task("Read", Some(""), None)).await.unwrap();
            assert_eq!(task.date, ymd(2024, 6, 1));
        }

        #[tokio::test]
        async fn test_future_date_is_kept() {
            let service = service(ymd(2024, 6, 1)).await;
            let task = service
                .create_task(new_task("Trip", Some("20240710"), Some("d 7")))
                .await
                .unwrap();
            assert_eq!(task.date, ymd(2024, 7, 10));
        }

        #[tokio::test]
        async fn test_today_is_not_stale() {
            let service = service(ymd(2024, 6, 1)).await;
            let task = service
                .create_task(new_task("Stretch", Some("20240601"), Some("d 1")))
                .await
                .unwrap();
            assert_eq!(task.date, ymd(2024, 6, 1));
        }

        #[tokio::test]
        async fn test_past_one_shot_resets_to_today() {
            let service = service(ymd(2024, 6, 1)).await;
            let task = service
                .create_task(new_task("Call mom", Some("20240101"), None))
                .await
                .unwrap();
            assert_eq!(task.date, ymd(2024, 6, 1));
            assert!(!task.is_recurring());
        }

        #[tokio::test]
        async fn test_past_recurring_advances_to_first_occurrence() {
            let service = service(ymd(2024, 1, 15)).await;
            let task = service
                .create_task(new_task("Laundry", Some("20240101"), Some("d 7")))
                .await
                .unwrap();
            assert_eq!(task.date, ymd(2024, 1, 15));

            let task = service
                .create_task(new_task("Birthday", Some("20230301"), Some("y")))
                .await
                .unwrap();
            assert_eq!(task.date, ymd(2024, 3, 1));
        }

        #[tokio::test]
        async fn test_directive_is_trimmed_and_canonical() {
            let service = service(ymd(2024, 1, 1)).await;
            let task = service
                .create_task(new_task("Plants", None, Some("  d   3 ")))
                .await
                .unwrap();
            assert_eq!(task.directive.as_deref(), Some("d 3"));

            let task = service
                .create_task(new_task("Once", None, Some("   ")))
                .await
                .unwrap();
            assert_eq!(task.directive, None);
        }

        #[tokio::test]
        async fn test_validation_failures_do_not_persist() {
            let service = service(ymd(2024, 1, 1)).await;

            assert!(matches!(
                service.create_task(new_task("  ", None, None)).await,
                Err(CoreError::InvalidInput(_))
            ));
            assert!(matches!(
                service.create_task(new_task("Bad", Some("2024-01-01"), None)).await,
                Err(CoreError::Validation(ValidationError::InvalidDateFormat(_)))
            ));
            assert!(matches!(
                service.create_task(new_task("Bad", None, Some("d 400"))).await,
                Err(CoreError::Validation(ValidationError::IntervalOutOfRange(_)))
            ));
            assert!(matches!(
                service.create_task(new_task("Bad", None, Some("x"))).await,
                Err(CoreError::Validation(ValidationError::UnknownRuleKind(_)))
            ));

            let stored = service.list_tasks(&TaskFilter::default()).await.unwrap();
            assert!(stored.is_empty());
        }
    }

    mod update_tests {
        use super::*;

        #[tokio::test]
        async fn test_partial_update_keeps_other_fields() {
            let service = service(ymd(2024, 1, 1)).await;
            let task = service
                .create_task(NewTaskData {
                    title: "Gym".to_string(),
                    date: Some("20240105".to_string()),
                    comment: Some("legs".to_string()),
                    directive: Some("d 2".to_string()),
                })
                .await
                .unwrap();

            let updated = service
                .update_task(
                    task.id,
                    UpdateTaskData {
                        title: Some("Gym session".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            assert_eq!(updated.title, "Gym session");
            assert_eq!(updated.date, ymd(2024, 1, 5));
            assert_eq!(updated.comment.as_deref(), Some("legs"));
            assert_eq!(updated.directive.as_deref(), Some("d 2"));
        }

        #[tokio::test]
        async fn test_edit_reapplies_staleness_policy() {
            let service = service(ymd(2024, 1, 15)).await;
            let task = service.create_task(new_task("Review", None, None)).await.unwrap();

            let updated = service
                .update_task(
                    task.id,
                    UpdateTaskData {
                        date: Some("20240101".to_string()),
                        directive: Some(Some("d 10".to_string())),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            assert_eq!(updated.date, ymd(2024, 1, 21));

            let cleared = service
                .update_task(
                    task.id,
                    UpdateTaskData {
                        date: Some("20231231".to_string()),
                        directive: Some(None),
                        comment: Some(None),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            assert_eq!(cleared.date, ymd(2024, 1, 15));
            assert_eq!(cleared.directive, None);

            let stored = service.get_task(task.id).await.unwrap();
            assert_eq!(stored.date, cleared.date);
            assert_eq!(stored.directive, None);
        }

        #[tokio::test]
        async fn test_invalid_edit_leaves_task_untouched() {
            let service = service(ymd(2024, 1, 1)).await;
            let task = service
                .create_task(new_task("Stable", Some("20240110"), Some("y")))
                .await
                .unwrap();

            let result = service
                .update_task(
                    task.id,
                    UpdateTaskData {
                        title: Some("Changed".to_string()),
                        directive: Some(Some("y 2".to_string())),
                        ..Default::default()
                    },
                )
                .await;
            assert!(matches!(
                result,
                Err(CoreError::Validation(ValidationError::MalformedYearlyRule))
            ));

            let stored = service.get_task(task.id).await.unwrap();
            assert_eq!(stored.title, "Stable");
            assert_eq!(stored.directive.as_deref(), Some("y"));
        }

        #[tokio::test]
        async fn test_update_missing_task() {
            let service = service(ymd(2024, 1, 1)).await;
            let result = service
                .update_task(Uuid::now_v7(), UpdateTaskData::default())
                .await;
            assert!(matches!(result, Err(CoreError::NotFound(_))));
        }
    }

    mod complete_tests {
        use super::*;

        #[tokio::test]
        async fn test_one_shot_task_is_removed() {
            let service = service(ymd(2024, 1, 1)).await;
            let task = service.create_task(new_task("Once", None, None)).await.unwrap();

            let result = service.complete_task(task.id).await.unwrap();
            assert!(matches!(result, CompletionResult::Removed(ref t) if t.id == task.id));
            assert!(matches!(
                service.get_task(task.id).await,
                Err(CoreError::NotFound(_))
            ));
        }

        #[tokio::test]
        async fn test_recurring_task_advances_from_stored_date() {
            let service = service(ymd(2024, 1, 1)).await;
            let task = service
                .create_task(new_task("Trash", Some("20240110"), Some("d 7")))
                .await
                .unwrap();

            // Done early: one step from the stored date, not from today.
            let result = service.complete_task(task.id).await.unwrap();
            match result {
                CompletionResult::Rescheduled { task, previous_date } => {
                    assert_eq!(previous_date, ymd(2024, 1, 10));
                    assert_eq!(task.date, ymd(2024, 1, 17));
                }
                other => panic!("Expected rescheduled task, got {:?}", other),
            }

            let stored = service.get_task(task.id).await.unwrap();
            assert_eq!(stored.date, ymd(2024, 1, 17));
        }

        #[tokio::test]
        async fn test_overdue_recurring_task_catches_up() {
            let repo = SqliteRepository::new(establish_in_memory().await.unwrap());
            let early = TaskService::with_clock(repo.clone(), FixedClock(ymd(2024, 1, 1)));
            let task = early
                .create_task(new_task("Backup", Some("20240101"), Some("d 3")))
                .await
                .unwrap();

            let late = TaskService::with_clock(repo, FixedClock(ymd(2024, 1, 20)));
            match late.complete_task(task.id).await.unwrap() {
                CompletionResult::Rescheduled { task, .. } => {
                    assert_eq!(task.date, ymd(2024, 1, 22));
                }
                other => panic!("Expected rescheduled task, got {:?}", other),
            }
        }

        /// Moves every task one day forward right after it has been read,
        /// as a concurrent writer would.
        struct RacingRepository(SqliteRepository);

        #[async_trait::async_trait]
        impl TaskRepository for RacingRepository {
            async fn insert_task(&self, task: &Task) -> Result<(), CoreError> {
                self.0.insert_task(task).await
            }
            async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError> {
                let task = self.0.find_task_by_id(id).await?;
                if let Some(task) = &task {
                    let moved = task.date.succ_opt().unwrap();
                    self.0.reschedule_task(id, task.date, moved, Utc::now()).await?;
                }
                Ok(task)
            }
            async fn find_tasks_by_short_id_prefix(&self, short_id: &str) -> Result<Vec<Task>, CoreError> {
                self.0.find_tasks_by_short_id_prefix(short_id).await
            }
            async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, CoreError> {
                self.0.find_tasks(filter).await
            }
            async fn update_task(&self, task: &Task) -> Result<(), CoreError> {
                self.0.update_task(task).await
            }
            async fn reschedule_task(
                &self,
                id: Uuid,
                expected: NaiveDate,
                next: NaiveDate,
                updated_at: chrono::DateTime<Utc>,
            ) -> Result<bool, CoreError> {
                self.0.reschedule_task(id, expected, next, updated_at).await
            }
            async fn delete_task(&self, id: Uuid) -> Result<(), CoreError> {
                self.0.delete_task(id).await
            }
            async fn delete_one_shot_task(&self, id: Uuid) -> Result<bool, CoreError> {
                self.0.delete_one_shot_task(id).await
            }
        }

        #[tokio::test]
        async fn test_concurrent_change_is_a_conflict() {
            let repo = SqliteRepository::new(establish_in_memory().await.unwrap());
            let today = FixedClock(ymd(2024, 1, 1));
            let task = TaskService::with_clock(repo.clone(), today)
                .create_task(new_task("Race", Some("20240105"), Some("d 1")))
                .await
                .unwrap();

            let racing = TaskService::with_clock(RacingRepository(repo.clone()), today);
            assert!(matches!(
                racing.complete_task(task.id).await,
                Err(CoreError::Conflict(id)) if id == task.id.to_string()
            ));

            // Only the concurrent writer's change landed.
            let stored = repo.find_task_by_id(task.id).await.unwrap().unwrap();
            assert_eq!(stored.date, ymd(2024, 1, 6));
        }

        #[tokio::test]
        async fn test_completion_past_year_9999_keeps_task() {
            let service = service(ymd(2024, 1, 1)).await;
            let task = service
                .create_task(new_task("Far future", Some("99991231"), Some("y")))
                .await
                .unwrap();

            assert!(matches!(
                service.complete_task(task.id).await,
                Err(CoreError::DateOutOfRange(_))
            ));
            let stored = service.get_task(task.id).await.unwrap();
            assert_eq!(stored.date, ymd(9999, 12, 31));
        }

        #[tokio::test]
        async fn test_complete_missing_task() {
            let service = service(ymd(2024, 1, 1)).await;
            assert!(matches!(
                service.complete_task(Uuid::now_v7()).await,
                Err(CoreError::NotFound(_))
            ));
        }
    }

    mod resolve_tests {
        use super::*;

        #[tokio::test]
        async fn test_resolve_full_and_short_ids() {
            let service = service(ymd(2024, 1, 1)).await;
            let task = service.create_task(new_task("Find me", None, None)).await.unwrap();
            let full = task.id.to_string();

            assert_eq!(service.resolve_task_id(&full).await.unwrap(), task.id);
            assert_eq!(service.resolve_task_id(&full[..10]).await.unwrap(), task.id);
            assert!(matches!(
                service.resolve_task_id("z").await,
                Err(CoreError::InvalidInput(_))
            ));
            assert!(matches!(
                service.resolve_task_id("zz").await,
                Err(CoreError::NotFound(_))
            ));
        }

        #[tokio::test]
        async fn test_resolve_ambiguous_prefix() {
            let repo = SqliteRepository::new(establish_in_memory().await.unwrap());
            for (id, title) in [
                ("0190a1b2-0000-7000-8000-000000000001", "One"),
                ("0190a1b2-0000-7000-8000-000000000002", "Two"),
            ] {
                let now = Utc::now();
                repo.insert_task(&Task {
                    id: Uuid::parse_str(id).unwrap(),
                    date: ymd(2024, 1, 1),
                    title: title.to_string(),
                    comment: None,
                    directive: None,
                    created_at: now,
                    updated_at: now,
                })
                .await
                .unwrap();
            }
            let service = TaskService::with_clock(repo, FixedClock(ymd(2024, 1, 1)));

            for prefix in ["0190a1b2", "0190A1B2-0000"] {
                match service.resolve_task_id(prefix).await {
                    Err(CoreError::AmbiguousId(candidates)) => {
                        let mut titles: Vec<_> =
                            candidates.iter().map(|(_, t)| t.as_str()).collect();
                        titles.sort();
                        assert_eq!(titles, ["One", "Two"]);
                    }
                    other => panic!("Expected an ambiguous id, got {:?}", other),
                }
            }
        }

        #[tokio::test]
        async fn test_resolve_treats_wildcards_literally() {
            let service = service(ymd(2024, 1, 1)).await;
            service.create_task(new_task("Only task", None, None)).await.unwrap();

            for pattern in ["%%", "__", "%_", "0%"] {
                assert!(
                    matches!(
                        service.resolve_task_id(pattern).await,
                        Err(CoreError::NotFound(_))
                    ),
                    "{pattern} must not match"
                );
            }
        }
    }
}
