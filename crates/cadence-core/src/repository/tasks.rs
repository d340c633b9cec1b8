use crate::error::CoreError;
use crate::lifecycle::{self, LifecycleOutcome};
use crate::models::{CompletionResult, NewTaskData, Task, TaskSearch, UpdateTaskData};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite};
use tracing::{info, warn};
use uuid::Uuid;

#[async_trait]
impl super::TaskRepository for SqliteRepository {
    async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError> {
        let now = Utc::now();
        let task: Task = sqlx::query_as(
            r#"INSERT INTO scheduler (id, date, title, comment, repeat, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(data.date)
        .bind(&data.title)
        .bind(&data.comment)
        .bind(data.repeat.to_string())
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        info!(task_id = %task.id, date = %task.date, "task added");
        Ok(task)
    }

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as("SELECT * FROM scheduler WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    async fn find_tasks_by_short_id_prefix(&self, short_id: &str) -> Result<Vec<Task>, CoreError> {
        let prefix: String = short_id
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let pattern = format!("{}%", escape_like(&prefix));

        let tasks: Vec<Task> =
            sqlx::query_as(r"SELECT * FROM scheduler WHERE lower(hex(id)) LIKE ? ESCAPE '\'")
                .bind(pattern)
            .fetch_all(self.pool())
            .await?;
        Ok(tasks)
    }

    async fn find_tasks(
        &self,
        search: &TaskSearch,
        today: NaiveDate,
        limit: u32,
    ) -> Result<Vec<Task>, CoreError> {
        let mut query_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM scheduler WHERE ");

        match search {
            TaskSearch::Upcoming => {
                query_builder.push("date >= ").push_bind(today);
            }
            TaskSearch::OnDate(date) => {
                query_builder.push("date = ").push_bind(*date);
            }
            TaskSearch::Text(text) => {
                let pattern = format!("%{}%", escape_like(text));
                query_builder
                    .push("date >= ")
                    .push_bind(today)
                    .push(" AND (title LIKE ")
                    .push_bind(pattern.clone())
                    .push(r" ESCAPE '\' OR comment LIKE ")
                    .push_bind(pattern)
                    .push(r" ESCAPE '\')");
            }
        }

        query_builder
            .push(" ORDER BY date ASC, created_at ASC LIMIT ")
            .push_bind(i64::from(limit));

        let tasks = query_builder
            .build_query_as()
            .fetch_all(self.pool())
            .await?;
        Ok(tasks)
    }

    async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError> {
        let task: Task = sqlx::query_as(
            r#"UPDATE scheduler
            SET date = $1, title = $2, comment = $3, repeat = $4, updated_at = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(data.date)
        .bind(&data.title)
        .bind(&data.comment)
        .bind(data.repeat.to_string())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        info!(task_id = %task.id, date = %task.date, "task updated");
        Ok(task)
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM scheduler WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    async fn complete_task(&self, id: Uuid, today: NaiveDate) -> Result<CompletionResult, CoreError> {
        let mut tx = self.pool().begin().await?;

        // Claim the write lock before reading so concurrent completions queue
        // behind each other instead of failing on a lock upgrade.
        let claimed = sqlx::query("UPDATE scheduler SET updated_at = updated_at WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if claimed.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }

        let task: Task = sqlx::query_as("SELECT * FROM scheduler WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        match lifecycle::on_complete(&task, today) {
            LifecycleOutcome::Delete(_) => {
                sqlx::query("DELETE FROM scheduler WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                tx.commit().await?;

                info!(task_id = %id, "completed one-shot task removed");
                Ok(CompletionResult::Deleted(task))
            }
            LifecycleOutcome::Reschedule(_, next) => {
                let rescheduled: Task = sqlx::query_as(
                    r#"UPDATE scheduler
                    SET date = $1, updated_at = $2
                    WHERE id = $3
                    RETURNING *
                    "#,
                )
                .bind(next)
                .bind(Utc::now())
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
                tx.commit().await?;

                info!(task_id = %id, date = %next, "completed task rescheduled");
                Ok(CompletionResult::Rescheduled(rescheduled))
            }
            LifecycleOutcome::Fail(reason) => {
                // Dropping the transaction rolls it back; the task is untouched.
                warn!(task_id = %id, error = %reason, "completion rejected");
                Err(reason.into())
            }
        }
    }
}

/// Escapes LIKE wildcards so user text matches literally under `ESCAPE '\'`.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("100%", "100\\%")]
    #[case("snake_case", "snake\\_case")]
    #[case("C:\\dir", "C:\\\\dir")]
    fn test_escape_like(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_like(input), expected);
    }
}
