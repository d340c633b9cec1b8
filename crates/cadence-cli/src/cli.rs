use clap::{Parser, Subcommand};

/// A small scheduler for one-shot and recurring tasks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new task
    Add(AddCommand),
    /// List upcoming tasks
    List(ListCommand),
    /// Show a single task
    Show(ShowCommand),
    /// Edit a task
    Edit(EditCommand),
    /// Mark a task as done; recurring tasks move to their next date
    Done(DoneCommand),
    /// Delete a task
    Delete(DeleteCommand),
    /// Compute the next date for a rule without touching storage
    NextDate(NextDateCommand),
    /// Run the HTTP API
    Serve(ServeCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,
    /// A free-form comment
    #[clap(short, long)]
    pub comment: Option<String>,
    /// Due date (YYYYMMDD or e.g. "next monday"); defaults to today
    #[clap(short, long)]
    pub date: Option<String>,
    /// Recurrence rule, e.g. "d 7", "y", "w 1,3,5", "m -1", "m 10 1,12"
    #[clap(short, long, default_value = "")]
    pub repeat: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Text to look for, or a DD.MM.YYYY date
    #[clap(short, long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// The ID (or unique ID prefix) of the task
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID (or unique ID prefix) of the task to edit
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub comment: Option<String>,
    #[arg(long, conflicts_with = "comment")]
    pub comment_clear: bool,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long, help = "Replace the recurrence rule")]
    pub repeat: Option<String>,
    #[arg(long, conflicts_with = "repeat", help = "Remove recurrence (convert to one-time task)")]
    pub repeat_clear: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DoneCommand {
    /// The ID (or unique ID prefix) of the task to mark as done
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID (or unique ID prefix) of the task to delete
    pub id: String,
    /// Delete without asking for confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct NextDateCommand {
    /// Reference day (YYYYMMDD); defaults to today
    #[clap(long)]
    pub now: Option<String>,
    /// Anchor date (YYYYMMDD)
    #[clap(long)]
    pub date: String,
    /// Recurrence rule
    #[clap(long)]
    pub repeat: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeCommand {
    /// Address to listen on, overriding the configuration
    #[clap(short, long)]
    pub listen: Option<String>,
}
