use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./planner.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add(AddCommand),
    /// List scheduled tasks in date order
    List(ListCommand),
    /// Show a single task
    Show(ShowCommand),
    /// Edit an existing task
    Edit(EditCommand),
    /// Complete a task: one-shot tasks are removed, recurring ones move to their next date
    Done(DoneCommand),
    /// Delete a task
    Delete(DeleteCommand),
    /// Compute the next occurrence of a directive without touching the database
    Next(NextCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,

    /// Scheduled date (YYYYMMDD, defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    #[arg(short, long)]
    pub comment: Option<String>,

    /// Recurrence directive: "y" (yearly) or "d N" (every N days, 1-366)
    #[arg(short, long, value_name = "DIRECTIVE")]
    pub repeat: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Only tasks scheduled on or after this date (YYYYMMDD)
    #[arg(long)]
    pub from: Option<String>,

    /// Case-insensitive text to look for in titles and comments
    #[arg(short, long)]
    pub search: Option<String>,

    /// Maximum number of tasks (defaults to the configured list_limit)
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// The ID (or a unique prefix) of the task
    pub id: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID (or a unique prefix) of the task to edit
    pub id: String,

    #[arg(short, long)]
    pub title: Option<String>,

    /// New date (YYYYMMDD)
    #[arg(short, long)]
    pub date: Option<String>,

    #[arg(short, long)]
    pub comment: Option<String>,
    /// Remove the comment
    #[arg(long, conflicts_with = "comment")]
    pub clear_comment: bool,

    /// New recurrence directive
    #[arg(short, long, value_name = "DIRECTIVE")]
    pub repeat: Option<String>,
    /// Make the task one-shot
    #[arg(long, conflicts_with = "repeat")]
    pub clear_repeat: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DoneCommand {
    /// The ID (or a unique prefix) of the task to complete
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID (or a unique prefix) of the task to delete
    pub id: String,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct NextCommand {
    /// Reference date (YYYYMMDD)
    #[arg(long)]
    pub now: String,

    /// Date to advance from (YYYYMMDD)
    #[arg(long)]
    pub date: String,

    /// Recurrence directive
    #[arg(long, value_name = "DIRECTIVE", allow_hyphen_values = true)]
    pub repeat: String,
}
