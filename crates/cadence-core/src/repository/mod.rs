use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{CompletionResult, NewTaskData, Task, TaskSearch, UpdateTaskData};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

pub mod tasks;

/// Storage collaborator for tasks.
///
/// Implementations own atomicity: `complete_task` must apply its
/// read-compute-write sequence as a single unit.
#[async_trait]
pub trait TaskRepository {
    async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError>;
    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError>;
    /// Tasks whose id, written as hex without dashes, starts with `short_id`.
    async fn find_tasks_by_short_id_prefix(&self, short_id: &str) -> Result<Vec<Task>, CoreError>;
    async fn find_tasks(
        &self,
        search: &TaskSearch,
        today: NaiveDate,
        limit: u32,
    ) -> Result<Vec<Task>, CoreError>;
    async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError>;
    async fn complete_task(&self, id: Uuid, today: NaiveDate) -> Result<CompletionResult, CoreError>;
}

/// SQLite implementation of the repository pattern
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}
