//! Task lifecycle decisions.
//!
//! Decides what a create, edit or completion means for a task's due date.
//! Nothing here touches storage or reads the clock: callers pass `today` and
//! apply the returned value themselves.

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::dates;
use crate::error::{CoreError, EvalError};
use crate::models::{NewTaskData, Task, UpdateTaskData};
use crate::recurrence::next_occurrence;
use crate::rule::RecurrenceRule;

/// Raw task fields as supplied by a caller (HTTP body or CLI flags).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub comment: Option<String>,
    /// `YYYYMMDD`; `None` or empty means today
    pub date: Option<String>,
    /// Compact rule text; empty means one-shot
    pub repeat: String,
}

/// What to do with a task that has just been completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleOutcome {
    Delete(Uuid),
    Reschedule(Uuid, NaiveDate),
    /// Nothing may be written; the task stays as it is.
    Fail(EvalError),
}

struct ValidatedDraft {
    title: String,
    comment: Option<String>,
    date: NaiveDate,
    repeat: RecurrenceRule,
}

fn validate(draft: &TaskDraft, today: NaiveDate) -> Result<ValidatedDraft, CoreError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(CoreError::InvalidInput("Task title must not be empty".to_string()));
    }

    let date = match draft.date.as_deref().map(str::trim) {
        None | Some("") => today,
        Some(text) => dates::parse_date(text)?,
    };

    let repeat = RecurrenceRule::parse(&draft.repeat)?;

    Ok(ValidatedDraft {
        title: title.to_string(),
        comment: draft.comment.clone().filter(|c| !c.trim().is_empty()),
        date,
        repeat,
    })
}

/// Validates a new task and normalises its due date.
///
/// # Behavior
/// - One-shot tasks are never created in the past: earlier dates snap to `today`.
/// - Recurring tasks dated before `today` are advanced to their next occurrence.
/// - Recurring tasks dated today or later keep their date; the rule is only
///   evaluated once the task is completed.
pub fn on_create(draft: &TaskDraft, today: NaiveDate) -> Result<NewTaskData, CoreError> {
    let draft = validate(draft, today)?;

    let date = if !draft.repeat.is_recurring() {
        draft.date.max(today)
    } else if draft.date < today {
        next_occurrence(draft.date, today, &draft.repeat)?
    } else {
        draft.date
    };

    debug!(requested = ?draft.date, scheduled = %date, repeat = %draft.repeat, "planned new task");

    Ok(NewTaskData {
        date,
        title: draft.title,
        comment: draft.comment,
        repeat: draft.repeat,
    })
}

/// Validates an edit. The date is kept exactly as given and the rule is only
/// parsed, not evaluated.
pub fn on_update(draft: &TaskDraft, today: NaiveDate) -> Result<UpdateTaskData, CoreError> {
    let draft = validate(draft, today)?;

    Ok(UpdateTaskData {
        date: draft.date,
        title: draft.title,
        comment: draft.comment,
        repeat: draft.repeat,
    })
}

/// Decides the fate of a completed task.
pub fn on_complete(task: &Task, today: NaiveDate) -> LifecycleOutcome {
    if !task.repeat.is_recurring() {
        debug!(task_id = %task.id, "one-shot task completed, deleting");
        return LifecycleOutcome::Delete(task.id);
    }

    match next_occurrence(task.date, today, &task.repeat) {
        Ok(next) => {
            debug!(task_id = %task.id, from = %task.date, to = %next, "rescheduling task");
            LifecycleOutcome::Reschedule(task.id, next)
        }
        Err(reason) => {
            debug!(task_id = %task.id, error = %reason, "cannot reschedule task");
            LifecycleOutcome::Fail(reason)
        }
    }
}
