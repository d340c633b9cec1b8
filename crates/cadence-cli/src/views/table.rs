use cadence_core::dates;
use cadence_core::models::Task;
use chrono::{Duration, NaiveDate};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};

const SHORT_ID_LEN: usize = 8;

pub fn short_id(task: &Task) -> String {
    task.id.to_string()[..SHORT_ID_LEN].to_string()
}

/// Relative wording for a due date, e.g. "today" or "in 3 days".
pub fn relative_due(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "today".to_string();
    }
    Duration::days((date - today).num_days()).humanize()
}

fn due_cell(date: NaiveDate, today: NaiveDate) -> Cell {
    let text = format!("{} ({})", dates::format_date(date), relative_due(date, today));
    if date < today {
        Cell::new(text).fg(Color::Red) // Overdue
    } else if date == today {
        Cell::new(text).fg(Color::Yellow) // Due today
    } else {
        Cell::new(text)
    }
}

pub fn build_task_table(tasks: &[Task], today: NaiveDate) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Due", "Repeat", "Comment"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(task)));

        let mut title = String::new();
        if task.repeat.is_recurring() {
            title.push('↻'); // Recurring symbol
            title.push(' ');
        }
        title.push_str(&task.title);
        row.add_cell(Cell::new(title).add_attribute(Attribute::Bold));

        row.add_cell(due_cell(task.date, today));

        let repeat_cell = if task.repeat.is_recurring() {
            Cell::new(task.repeat.to_string()).fg(Color::Cyan)
        } else {
            Cell::new("-").fg(Color::DarkGrey)
        };
        row.add_cell(repeat_cell);
        row.add_cell(Cell::new(task.comment.as_deref().unwrap_or("")));
        table.add_row(row);
    }

    table
}

pub fn display_tasks(tasks: &[Task], today: NaiveDate) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    println!("{}", build_task_table(tasks, today));
}

pub fn display_task_details(task: &Task, today: NaiveDate) {
    let mut table = Table::new();
    table.add_row(vec![Cell::new("ID"), Cell::new(task.id.to_string())]);
    table.add_row(vec![Cell::new("Title"), Cell::new(&task.title)]);
    table.add_row(vec![Cell::new("Due"), due_cell(task.date, today)]);
    table.add_row(vec![
        Cell::new("Repeat"),
        Cell::new(if task.repeat.is_recurring() {
            task.repeat.to_string()
        } else {
            "never".to_string()
        }),
    ]);
    table.add_row(vec![
        Cell::new("Comment"),
        Cell::new(task.comment.as_deref().unwrap_or("")),
    ]);
    table.add_row(vec![
        Cell::new("Updated"),
        Cell::new(task.updated_at.humanize()),
    ]);
    println!("{table}");
}
