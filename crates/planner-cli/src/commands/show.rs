use anyhow::Result;
use planner_core::lifecycle::TaskService;
use planner_core::repository::TaskRepository;

use crate::cli::ShowCommand;
use crate::util::print_json;
use crate::views::table::display_task;

pub async fn show_task(service: &TaskService<impl TaskRepository>, command: ShowCommand) -> Result<()> {
    let task_id = service.resolve_task_id(&command.id).await?;
    let task = service.get_task(task_id).await?;

    if command.json {
        print_json(&task)
    } else {
        display_task(&task, service.today());
        Ok(())
    }
}
