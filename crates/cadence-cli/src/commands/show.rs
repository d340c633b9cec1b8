use anyhow::Result;
use cadence_core::error::CoreError;
use cadence_core::repository::TaskRepository;

use crate::cli::ShowCommand;
use crate::util::{resolve_task_id, today};
use crate::views::table::display_task_details;

pub async fn show_task(repo: &(impl TaskRepository + Sync), command: ShowCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;
    let task = repo
        .find_task_by_id(task_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(task_id.to_string()))?;

    display_task_details(&task, today());

    Ok(())
}
