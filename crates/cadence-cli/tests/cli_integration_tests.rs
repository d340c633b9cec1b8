/// CLI integration tests for cadence
///
/// These tests run the binary as a black box against a temporary database.
use chrono::{Duration, Local};
use predicates::prelude::*;
use rstest::rstest;

mod helpers;
use helpers::{assertions, strip_ansi, CliTestHarness};

fn days_from_today(days: i64) -> String {
    (Local::now().date_naive() + Duration::days(days))
        .format("%Y%m%d")
        .to_string()
}

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("recurring"))
        .stdout(predicate::str::contains("next-date"));

    harness
        .run_success(&["--version"])
        .stdout(predicate::str::contains("cadence"));

    harness
        .run_failure(&["invalid-command"])
        .stderr(assertions::has_error());
}

#[rstest]
#[case("20240126", "20240113", "d 7", "20240127")]
#[case("20240126", "20240126", "y", "20250126")]
#[case("20240126", "20240229", "y", "20250301")]
#[case("20240126", "20240126", "w 1,4,5", "20240129")]
#[case("20240126", "20240126", "m -1", "20240131")]
#[case("20240201", "20240115", "m -1", "20240229")]
#[case("20240126", "20240126", "m 1,-1 2,8", "20240201")]
fn test_next_date_command(
    #[case] now: &str,
    #[case] date: &str,
    #[case] repeat: &str,
    #[case] expected: &str,
) {
    let harness = CliTestHarness::new();
    harness
        .run_success(&["next-date", "--now", now, "--date", date, "--repeat", repeat])
        .stdout(format!("{}\n", expected));

    // No database is needed for pure computation
    assert!(!harness.db_path().exists());
}

#[rstest]
#[case("20240126", "k 34")]
#[case("20240126", "d 401")]
#[case("20240126", "w 8")]
#[case("20240126", "m 0")]
#[case("20240126", "")]
#[case("2024-01-26", "d 1")]
fn test_next_date_command_errors(#[case] date: &str, #[case] repeat: &str) {
    let harness = CliTestHarness::new();
    harness
        .run_failure(&["next-date", "--now", "20240126", "--date", date, "--repeat", repeat])
        .stderr(assertions::has_error());
}

#[test]
fn test_add_and_list() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["add", "Buy milk"])
        .stdout(assertions::task_created_successfully());

    let next_week = days_from_today(7);
    harness
        .run_success(&["add", "Swim", "--repeat", "w 1,3,5", "--comment", "pool"])
        .stdout(predicate::str::contains("Created recurring task"));
    harness.run_success(&["add", "Dentist", "--date", &next_week]);

    harness
        .run_success(&["list"])
        .stdout(assertions::has_task_table_headers())
        .stdout(predicate::str::contains("Buy milk"))
        .stdout(predicate::str::contains("Swim"))
        .stdout(predicate::str::contains(next_week.as_str()));

    harness
        .run_success(&["list", "--search", "dent"])
        .stdout(predicate::str::contains("Dentist"))
        .stdout(predicate::str::contains("Buy milk").not());

    harness
        .run_success(&["list", "--search", "nothing-like-this"])
        .stdout(assertions::empty_result());
}

#[test]
fn test_add_rejects_invalid_input() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["add", "Bad rule", "--repeat", "x 1"])
        .stderr(predicate::str::contains("Invalid rule"));
    harness
        .run_failure(&["add", "Bad date", "--date", "someday maybe"])
        .stderr(assertions::has_error());
    harness
        .run_failure(&["add", "   "])
        .stderr(assertions::has_error());

    harness
        .run_success(&["list"])
        .stdout(assertions::empty_result());
}

#[test]
fn test_unsatisfiable_rule_is_rejected_only_on_done() {
    let harness = CliTestHarness::new();

    let id = harness.add_task(&["Never", "--repeat", "m 31 2"]);
    harness
        .run_success(&["list"])
        .stdout(predicate::str::contains("Never"));

    harness
        .run_failure(&["done", &id.to_string()])
        .stderr(predicate::str::contains("no occurrence"));
    harness
        .run_success(&["show", &id.to_string()])
        .stdout(predicate::str::contains("m 31 2"));
}

#[test]
fn test_done_one_shot_and_recurring() {
    let harness = CliTestHarness::new();

    let once = harness.add_task(&["Call plumber"]);
    harness
        .run_success(&["done", &once.to_string()])
        .stdout(predicate::str::contains("Completed task"));
    harness
        .run_failure(&["show", &once.to_string()])
        .stderr(predicate::str::contains("Not found"));

    let daily = harness.add_task(&["Water plants", "--repeat", "d 3"]);
    let output = harness
        .run_success(&["done", &daily.to_string()])
        .get_output()
        .stdout
        .clone();
    let output = strip_ansi(&String::from_utf8_lossy(&output));
    assert!(output.contains(&format!("Next due: {}", days_from_today(3))));

    harness
        .run_success(&["show", &daily.to_string()])
        .stdout(predicate::str::contains("d 3"))
        .stdout(predicate::str::contains(days_from_today(3)));
}

#[test]
fn test_edit_and_short_ids() {
    let harness = CliTestHarness::new();
    let id = harness.add_task(&["Read book", "--comment", "chapter 1"]);
    let short = &id.to_string()[..8];

    let later = days_from_today(10);
    harness
        .run_success(&["edit", short, "--title", "Read novel", "--date", &later, "--repeat", "y"])
        .stdout(predicate::str::contains("Updated task"));

    harness
        .run_success(&["show", short])
        .stdout(predicate::str::contains("Read novel"))
        .stdout(predicate::str::contains(later.as_str()))
        .stdout(predicate::str::contains("chapter 1"));

    harness
        .run_success(&["edit", short, "--repeat-clear", "--comment-clear"])
        .stdout(predicate::str::contains("Updated task"));
    harness
        .run_success(&["show", short])
        .stdout(predicate::str::contains("never"))
        .stdout(predicate::str::contains("chapter 1").not());

    harness
        .run_failure(&["edit", short, "--repeat", "w 0"])
        .stderr(predicate::str::contains("Invalid rule"));

    harness
        .run_failure(&["show", "x"])
        .stderr(predicate::str::contains("at least 2 characters"));
}

#[test]
fn test_delete_with_force() {
    let harness = CliTestHarness::new();
    let id = harness.add_task(&["Temporary"]);

    harness
        .run_success(&["delete", &id.to_string(), "--force"])
        .stdout(predicate::str::contains("Deleted task"));
    harness
        .run_success(&["list"])
        .stdout(assertions::empty_result());
    harness
        .run_failure(&["delete", &id.to_string(), "--force"])
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_database_location_from_environment() {
    let harness = CliTestHarness::new();
    assert!(!harness.db_path().exists());

    harness.run_success(&["add", "Persisted"]);
    assert!(harness.db_path().exists());
}
