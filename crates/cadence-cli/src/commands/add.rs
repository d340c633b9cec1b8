use anyhow::Result;
use cadence_core::dates;
use cadence_core::lifecycle::{self, TaskDraft};
use cadence_core::repository::TaskRepository;
use owo_colors::{OwoColorize, Style};

use crate::cli::AddCommand;
use crate::parser::due_date_text;
use crate::util::today;

pub async fn add_task(repo: &(impl TaskRepository + Sync), command: AddCommand) -> Result<()> {
    let draft = TaskDraft {
        title: command.title,
        comment: command.comment,
        date: due_date_text(command.date.as_deref())?,
        repeat: command.repeat,
    };

    let new_task_data = lifecycle::on_create(&draft, today())?;
    let added_task = repo.add_task(new_task_data).await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    if added_task.repeat.is_recurring() {
        println!(
            "{} Created recurring task: {}",
            "✓".style(success_style),
            added_task.title.bright_white().bold()
        );
        println!(
            "  {} Repeats: {}",
            "→".style(info_style),
            added_task.repeat.to_string().cyan()
        );
    } else {
        println!(
            "{} Created task: {}",
            "✓".style(success_style),
            added_task.title.bright_white().bold()
        );
    }
    println!(
        "  {} Task ID: {}",
        "→".style(info_style),
        added_task.id.to_string().yellow()
    );
    println!(
        "  {} Due: {}",
        "→".style(info_style),
        dates::format_date(added_task.date).cyan()
    );

    Ok(())
}
