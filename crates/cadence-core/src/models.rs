use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::dates;
use crate::rule::RecurrenceRule;

/// A scheduled task as persisted by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    /// Due date, the anchor for the next occurrence
    #[serde(with = "dates::serde_compact")]
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub comment: Option<String>,
    /// Stored as the compact rule text, empty for one-shot tasks
    #[sqlx(try_from = "String")]
    #[serde(default)]
    pub repeat: RecurrenceRule,
    #[serde(skip_serializing, default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing, default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            date: Utc::now().date_naive(),
            title: String::new(),
            comment: None,
            repeat: RecurrenceRule::None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Normalised values for a task about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaskData {
    pub date: NaiveDate,
    pub title: String,
    pub comment: Option<String>,
    pub repeat: RecurrenceRule,
}

/// Normalised replacement values for an existing task.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateTaskData {
    pub date: NaiveDate,
    pub title: String,
    pub comment: Option<String>,
    pub repeat: RecurrenceRule,
}

#[derive(Debug)]
pub enum CompletionResult {
    /// One-shot task, removed from storage
    Deleted(Task),
    /// Recurring task, moved to its next occurrence
    Rescheduled(Task),
}

/// How a task listing is narrowed down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSearch {
    /// Tasks due today or later
    Upcoming,
    /// Tasks due on exactly this date
    OnDate(NaiveDate),
    /// Upcoming tasks whose title or comment contains the text
    Text(String),
}

impl TaskSearch {
    /// Interprets free-form search input: `DD.MM.YYYY` selects a date,
    /// anything else non-blank is a text search.
    pub fn from_query(query: Option<&str>) -> Self {
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            None => TaskSearch::Upcoming,
            Some(q) => match dates::parse_search_date(q) {
                Some(date) => TaskSearch::OnDate(date),
                None => TaskSearch::Text(q.to_string()),
            },
        }
    }
}
