use anyhow::Result;
use owo_colors::{OwoColorize, Style};
use planner_core::date;
use planner_core::lifecycle::TaskService;
use planner_core::models::CompletionResult;
use planner_core::repository::TaskRepository;

use crate::cli::DoneCommand;
use crate::util::relative_date;

pub async fn done_task(service: &TaskService<impl TaskRepository>, command: DoneCommand) -> Result<()> {
    let task_id = service.resolve_task_id(&command.id).await?;
    let success_style = Style::new().green().bold();

    match service.complete_task(task_id).await? {
        CompletionResult::Removed(task) => {
            println!("{} Completed task: '{}'", "✓".style(success_style), task.title);
        }
        CompletionResult::Rescheduled { task, previous_date } => {
            println!(
                "{} Completed '{}' for {}",
                "✓".style(success_style),
                task.title,
                date::format(previous_date)
            );
            println!(
                "  Next occurrence: {} ({})",
                date::format(task.date).yellow(),
                relative_date(task.date, service.today())
            );
        }
    }

    Ok(())
}
