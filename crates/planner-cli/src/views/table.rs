use chrono::NaiveDate;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use owo_colors::{OwoColorize, Style};
use planner_core::date;
use planner_core::models::Task;

use crate::util::relative_date;

/// Marker shown before the title of recurring tasks.
const RECURRING_MARK: char = '↻';

pub fn short_id(task: &Task) -> String {
    task.id.to_string()[..8].to_string()
}

pub fn display_tasks(tasks: &[Task], today: NaiveDate) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Date", "When", "Repeat", "Comment"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(task)));

        let title = if task.is_recurring() {
            format!("{} {}", RECURRING_MARK, task.title)
        } else {
            task.title.clone()
        };
        let mut title_cell = Cell::new(title);
        if task.date < today {
            title_cell = title_cell.fg(Color::Red).add_attribute(Attribute::Bold);
        }
        row.add_cell(title_cell);

        row.add_cell(Cell::new(date::format(task.date)));

        let when = Cell::new(relative_date(task.date, today));
        row.add_cell(if task.date < today {
            when.fg(Color::Red) // Overdue
        } else if task.date == today {
            when.fg(Color::Yellow)
        } else {
            when
        });

        row.add_cell(Cell::new(task.directive.as_deref().unwrap_or("-")));
        row.add_cell(Cell::new(task.comment.as_deref().unwrap_or("")));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_task(task: &Task, today: NaiveDate) {
    let label = Style::new().bright_black();

    println!("{}", task.title.bright_white().bold());
    println!("  {} {}", "ID:     ".style(label), task.id.to_string().yellow());
    println!(
        "  {} {} ({})",
        "Date:   ".style(label),
        date::format(task.date),
        relative_date(task.date, today)
    );
    match task.directive.as_deref() {
        Some(directive) => println!("  {} {} {}", "Repeat: ".style(label), RECURRING_MARK, directive),
        None => println!("  {} once", "Repeat: ".style(label)),
    }
    if let Some(comment) = &task.comment {
        println!("  {} {}", "Comment:".style(label), comment);
    }
    println!(
        "  {} {}",
        "Updated:".style(label),
        task.updated_at.format("%Y-%m-%d %H:%M UTC")
    );
}
