use anyhow::Result;
use cadence_core::models::TaskSearch;
use cadence_core::repository::TaskRepository;

use crate::cli::ListCommand;
use crate::config::Config;
use crate::util::today;
use crate::views::table::display_tasks;

pub async fn list_tasks(
    repo: &(impl TaskRepository + Sync),
    command: ListCommand,
    config: &Config,
) -> Result<()> {
    let search = TaskSearch::from_query(command.search.as_deref());
    let today = today();
    let tasks = repo.find_tasks(&search, today, config.list_limit).await?;

    display_tasks(&tasks, today);

    Ok(())
}
