use anyhow::Result;
use cadence_core::dates;
use cadence_core::models::CompletionResult;
use cadence_core::repository::TaskRepository;
use owo_colors::OwoColorize;

use crate::cli::DoneCommand;
use crate::util::{resolve_task_id, today};

pub async fn done_task(repo: &(impl TaskRepository + Sync), command: DoneCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;

    match repo.complete_task(task_id, today()).await? {
        CompletionResult::Deleted(task) => {
            println!("{} Completed task: '{}'", "✓".green().bold(), task.title);
        }
        CompletionResult::Rescheduled(task) => {
            println!("{} Completed task: '{}'", "✓".green().bold(), task.title);
            println!(
                "  {} Next due: {}",
                "↻".blue(),
                dates::format_date(task.date).cyan()
            );
        }
    }

    Ok(())
}
