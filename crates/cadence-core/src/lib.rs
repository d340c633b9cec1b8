//! # Cadence Core Library
//!
//! Recurrence engine and task storage for a small personal scheduler.
//!
//! ## Features
//!
//! - **Compact Recurrence Rules**: `d 7`, `y`, `w 1,3,5`, `m -1`, `m 10 1,12`
//! - **Deterministic Evaluation**: next due date computed from an anchor and a
//!   caller-supplied "today", never from the system clock
//! - **Lifecycle Decisions**: create, edit and completion semantics kept apart
//!   from persistence
//! - **SQLite Storage**: sqlx-backed repository with atomic completion
//!
//! ## Core Modules
//!
//! - [`rule`]: Rule grammar, validation and canonical text
//! - [`recurrence`]: Next-occurrence evaluation
//! - [`lifecycle`]: What create, update and complete mean for a task's date
//! - [`dates`]: `YYYYMMDD` wire format helpers
//! - [`models`]: Core data structures and transfer objects
//! - [`repository`]: Data access layer with Repository pattern
//! - [`db`]: Database connection and migration management
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cadence_core::{
//!     db, lifecycle::{self, TaskDraft}, repository::{SqliteRepository, TaskRepository},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("scheduler.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!     let today = chrono::Local::now().date_naive();
//!
//!     let draft = TaskDraft {
//!         title: "Water the plants".to_string(),
//!         repeat: "d 3".to_string(),
//!         ..Default::default()
//!     };
//!     let task = repo.add_task(lifecycle::on_create(&draft, today)?).await?;
//!     println!("Next due: {}", task.date);
//!
//!     Ok(())
//! }
//! ```

pub mod dates;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod rule;
