use anyhow::Result;
use dialoguer::Confirm;
use planner_core::lifecycle::TaskService;
use planner_core::repository::TaskRepository;

use crate::cli::DeleteCommand;

pub async fn delete_task(service: &TaskService<impl TaskRepository>, command: DeleteCommand) -> Result<()> {
    let task_id = service.resolve_task_id(&command.id).await?;
    let task = service.get_task(task_id).await?;

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!("Are you sure you want to delete task '{}'?", task.title))
            .default(false)
            .interact()?;

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    service.delete_task(task.id).await?;
    println!("Deleted task: '{}'", task.title);
    Ok(())
}
