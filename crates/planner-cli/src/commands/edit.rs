use anyhow::{bail, Result};
use owo_colors::{OwoColorize, Style};
use planner_core::date;
use planner_core::lifecycle::TaskService;
use planner_core::models::UpdateTaskData;
use planner_core::repository::TaskRepository;

use crate::cli::EditCommand;
use crate::util::optional_change;

pub async fn edit_task(service: &TaskService<impl TaskRepository>, command: EditCommand) -> Result<()> {
    let update = UpdateTaskData {
        title: command.title,
        date: command.date,
        comment: optional_change(command.comment, command.clear_comment),
        directive: optional_change(command.repeat, command.clear_repeat),
    };

    if update.is_empty() {
        bail!("Nothing to change. Pass at least one of --title, --date, --comment, --repeat or a --clear-* flag.");
    }

    let task_id = service.resolve_task_id(&command.id).await?;
    let task = service.update_task(task_id, update).await?;

    println!(
        "{} Updated task: {}",
        "✓".style(Style::new().green().bold()),
        task.title.bright_white().bold()
    );
    println!("  Date: {}", date::format(task.date));
    match &task.directive {
        Some(directive) => println!("  Repeats: {}", directive),
        None => println!("  Repeats: once"),
    }

    Ok(())
}
