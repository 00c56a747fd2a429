use anyhow::Result;
use owo_colors::{OwoColorize, Style};
use planner_core::date;
use planner_core::lifecycle::TaskService;
use planner_core::models::NewTaskData;
use planner_core::repository::TaskRepository;

use crate::cli::AddCommand;
use crate::util::relative_date;

pub async fn add_task(service: &TaskService<impl TaskRepository>, command: AddCommand) -> Result<()> {
    let new_task_data = NewTaskData {
        title: command.title,
        date: command.date,
        comment: command.comment,
        directive: command.repeat,
    };

    let task = service.create_task(new_task_data).await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    let kind = if task.is_recurring() { "recurring task" } else { "task" };
    println!(
        "{} Created {}: {}",
        "✓".style(success_style),
        kind,
        task.title.bright_white().bold()
    );
    println!("  {} Task ID: {}", "→".style(info_style), task.id.to_string().yellow());
    println!(
        "  {} Date: {} ({})",
        "→".style(info_style),
        date::format(task.date),
        relative_date(task.date, service.today())
    );
    if let Some(directive) = &task.directive {
        println!("  {} Repeats: {}", "→".style(info_style), directive);
    }

    Ok(())
}
