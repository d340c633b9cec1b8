use anyhow::{anyhow, Result};
use cadence_core::error::CoreError;
use cadence_core::repository::TaskRepository;
use chrono::{Local, NaiveDate};
use uuid::Uuid;

/// The calendar day used as "today" for every lifecycle decision.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolves a full ID or a unique prefix of one.
pub async fn resolve_task_id(repo: &(impl TaskRepository + Sync), short_id: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(short_id) {
        return Ok(id);
    }
    if short_id.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }

    let tasks = repo.find_tasks_by_short_id_prefix(short_id).await?;
    match tasks.len() {
        1 => Ok(tasks[0].id),
        0 => Err(anyhow!(CoreError::NotFound(format!(
            "No task found with ID prefix '{}'",
            short_id
        )))),
        _ => {
            let task_info: Vec<(String, String)> = tasks
                .into_iter()
                .map(|t| (t.id.to_string(), t.title))
                .collect();
            Err(anyhow!(CoreError::AmbiguousId(task_info)))
        }
    }
}
