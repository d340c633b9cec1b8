use anyhow::Result;
use cadence_core::error::CoreError;
use cadence_core::repository::TaskRepository;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::cli::DeleteCommand;
use crate::util::resolve_task_id;

pub async fn delete_task(repo: &(impl TaskRepository + Sync), command: DeleteCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;
    let task = repo
        .find_task_by_id(task_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(task_id.to_string()))?;

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!(
                "Are you sure you want to delete task '{}'?",
                task.title
            ))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    repo.delete_task(task_id).await?;
    println!("{} Deleted task: '{}'", "✓".green().bold(), task.title);
    Ok(())
}
