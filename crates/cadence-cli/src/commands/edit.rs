use anyhow::Result;
use cadence_core::dates;
use cadence_core::error::CoreError;
use cadence_core::lifecycle::{self, TaskDraft};
use cadence_core::repository::TaskRepository;
use owo_colors::OwoColorize;

use crate::cli::EditCommand;
use crate::parser::due_date_text;
use crate::util::{resolve_task_id, today};

pub async fn edit_task(repo: &(impl TaskRepository + Sync), command: EditCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;
    let task = repo
        .find_task_by_id(task_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(task_id.to_string()))?;

    // Unspecified fields keep their stored values.
    let comment = if command.comment_clear {
        None
    } else {
        command.comment.or(task.comment)
    };
    let repeat = if command.repeat_clear {
        String::new()
    } else {
        command.repeat.unwrap_or_else(|| task.repeat.to_string())
    };
    let date = match due_date_text(command.date.as_deref())? {
        Some(date) => date,
        None => dates::format_date(task.date),
    };

    let draft = TaskDraft {
        title: command.title.unwrap_or(task.title),
        comment,
        date: Some(date),
        repeat,
    };

    let update = lifecycle::on_update(&draft, today())?;
    let updated = repo.update_task(task_id, update).await?;

    println!(
        "{} Updated task: {}",
        "✓".green().bold(),
        updated.title.bright_white().bold()
    );
    Ok(())
}
