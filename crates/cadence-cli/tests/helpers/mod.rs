#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;
use uuid::Uuid;

/// Test harness for running CLI commands with temporary databases
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("scheduler.db");

        Self { temp_dir, db_path }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("cadence").expect("Failed to find cadence binary");

        // Run inside the temp dir so no stray cadence.toml is picked up
        cmd.current_dir(self.temp_dir.path());
        cmd.env("CADENCE_DATABASE_PATH", &self.db_path);
        cmd.env_remove("RUST_LOG");

        cmd
    }

    /// Get the database path for this test instance
    pub fn db_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Adds a task and returns its ID as printed by the CLI
    pub fn add_task(&self, args: &[&str]) -> Uuid {
        let mut full_args = vec!["add"];
        full_args.extend_from_slice(args);
        let output = self.run_success(&full_args).get_output().stdout.clone();
        extract_task_id(&String::from_utf8_lossy(&output)).expect("No task ID in add output")
    }
}

/// Removes ANSI color sequences from CLI output
pub fn strip_ansi(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Finds the first full UUID in the output
pub fn extract_task_id(output: &str) -> Option<Uuid> {
    strip_ansi(output)
        .split_whitespace()
        .find_map(|word| Uuid::parse_str(word).ok())
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check if output contains task table headers
    pub fn has_task_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Title"))
            .and(predicate::str::contains("Due"))
    }

    /// Predicate to check if output indicates successful task creation
    pub fn task_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("✓")
            .and(predicate::str::contains("Created"))
    }

    /// Predicate to check for empty result set
    pub fn empty_result() -> impl Predicate<str> {
        predicate::str::contains("No tasks found")
    }

    /// Predicate to check for error messages
    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
