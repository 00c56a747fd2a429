use anyhow::Result;
use planner_core::date;
use planner_core::lifecycle::TaskService;
use planner_core::models::TaskFilter;
use planner_core::repository::TaskRepository;

use crate::cli::ListCommand;
use crate::config::Config;
use crate::util::print_json;
use crate::views::table::display_tasks;

pub async fn list_tasks(
    service: &TaskService<impl TaskRepository>,
    command: ListCommand,
    config: &Config,
) -> Result<()> {
    let filter = TaskFilter {
        from: command.from.as_deref().map(date::parse).transpose()?,
        search: command.search,
        limit: command.limit.unwrap_or(config.list_limit),
    };

    let tasks = service.list_tasks(&filter).await?;

    if command.json {
        print_json(&tasks)
    } else {
        display_tasks(&tasks, service.today());
        Ok(())
    }
}
