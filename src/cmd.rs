//! Command implementations for the CLI interface.
//!
//! Every handler brackets its work with an explicit load and (when needed) a
//! save of the task store; nothing is kept in memory between invocations.
//! Handlers write user-facing text to `out` and only return `Err` for I/O
//! failures or an exhausted id counter.

use std::io::Write;
use std::path::Path;

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::cli::{Cli, HELP_MESSAGE};
use crate::db::{write_table, Database};
use crate::error::Error;
use crate::fields::{ListFilter, Status};
use crate::task::{timestamp_now, TaskId};

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Task description.
        #[arg(allow_hyphen_values = true)]
        description: String,
    },

    /// Replace the description of a task.
    Update {
        /// Task ID.
        #[arg(allow_negative_numbers = true)]
        id: String,
        /// New description.
        #[arg(allow_hyphen_values = true)]
        description: String,
    },

    /// Delete a task.
    Delete {
        /// Task ID.
        #[arg(allow_negative_numbers = true)]
        id: String,
    },

    /// Mark a task as in progress.
    MarkInProgress {
        /// Task ID.
        #[arg(allow_negative_numbers = true)]
        id: String,
    },

    /// Mark a task as done.
    MarkDone {
        /// Task ID.
        #[arg(allow_negative_numbers = true)]
        id: String,
    },

    /// List tasks, optionally only those with one status.
    List {
        /// done | todo | in-progress
        #[arg(value_enum)]
        filter: Option<ListFilter>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// An id argument that is not an integer.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("ERROR: ID parameter [{0}] not an Integer.")]
pub struct InvalidId(pub String);

/// Parse a task id argument.
pub fn parse_id(raw: &str) -> Result<TaskId, InvalidId> {
    raw.trim().parse().map_err(|_| InvalidId(raw.to_string()))
}

/// Run one command against the store at `db_path`. No command prints help.
pub fn dispatch(command: Option<Commands>, db_path: &Path, out: &mut impl Write) -> Result<(), Error> {
    let Some(command) = command else {
        writeln!(out, "{HELP_MESSAGE}")?;
        return Ok(());
    };

    match command {
        Commands::Add { description } => cmd_add(db_path, description, out),
        Commands::Update { id, description } => match checked_id(&id, out)? {
            Some(id) => cmd_update(db_path, id, description, out),
            None => Ok(()),
        },
        Commands::Delete { id } => match checked_id(&id, out)? {
            Some(id) => cmd_delete(db_path, id, out),
            None => Ok(()),
        },
        Commands::MarkInProgress { id } => match checked_id(&id, out)? {
            Some(id) => cmd_mark(db_path, id, Status::InProgress, out),
            None => Ok(()),
        },
        Commands::MarkDone { id } => match checked_id(&id, out)? {
            Some(id) => cmd_mark(db_path, id, Status::Done, out),
            None => Ok(()),
        },
        Commands::List { filter } => cmd_list(db_path, filter, out),
        Commands::Completions { shell } => cmd_completions(shell, out),
    }
}

/// Parse `raw`, printing the type error and help text when it is not an integer.
fn checked_id(raw: &str, out: &mut impl Write) -> Result<Option<TaskId>, Error> {
    match parse_id(raw) {
        Ok(id) => Ok(Some(id)),
        Err(e) => {
            writeln!(out, "{e}")?;
            writeln!(out, "{HELP_MESSAGE}")?;
            Ok(None)
        }
    }
}

/// Report an unknown command or wrong argument count.
pub fn cmd_command_error(out: &mut impl Write) -> Result<(), Error> {
    writeln!(out, "COMMAND ERROR")?;
    writeln!(out, "{HELP_MESSAGE}")?;
    Ok(())
}

/// Add a new task.
pub fn cmd_add(db_path: &Path, description: String, out: &mut impl Write) -> Result<(), Error> {
    let mut db = Database::load(db_path)?;
    let id = db.add(description, &timestamp_now())?;
    db.save(db_path)?;
    info!(id, "task added");
    writeln!(out, "New task added. ID: {id}")?;
    Ok(())
}

/// Replace a task's description. Nothing is written when the id is unknown.
pub fn cmd_update(db_path: &Path, id: TaskId, description: String, out: &mut impl Write) -> Result<(), Error> {
    let mut db = Database::load(db_path)?;
    if !db.update_description(id, description, &timestamp_now()) {
        writeln!(out, "No task with ID: {id}")?;
        return Ok(());
    }
    db.save(db_path)?;
    info!(id, "task updated");
    writeln!(out, "Task {id} updated.")?;
    Ok(())
}

/// Delete a task.
///
/// The store is rewritten and success reported whether or not the id
/// existed; this differs from update and mark on purpose.
pub fn cmd_delete(db_path: &Path, id: TaskId, out: &mut impl Write) -> Result<(), Error> {
    let mut db = Database::load(db_path)?;
    let removed = db.remove(id);
    db.save(db_path)?;
    info!(id, removed, "task deleted");
    writeln!(out, "Task {id} removed.")?;
    Ok(())
}

/// Set a task's status. Nothing is written when the id is unknown.
pub fn cmd_mark(db_path: &Path, id: TaskId, status: Status, out: &mut impl Write) -> Result<(), Error> {
    let mut db = Database::load(db_path)?;
    if !db.set_status(id, status) {
        writeln!(out, "No task with ID: {id}")?;
        return Ok(());
    }
    db.save(db_path)?;
    info!(id, %status, "task status changed");
    match status {
        Status::Done => writeln!(out, "Task {id} marked as done.")?,
        _ => writeln!(out, "Task {id} marked as in progress.")?,
    }
    Ok(())
}

/// Print all tasks, or those matching `filter`, as a table.
pub fn cmd_list(db_path: &Path, filter: Option<ListFilter>, out: &mut impl Write) -> Result<(), Error> {
    let db = Database::load(db_path)?;
    let tasks = db.matching(filter.map(Status::from));
    if tasks.is_empty() {
        writeln!(out, "{}", filter.map_or("No task.", ListFilter::empty_message))?;
        return Ok(());
    }
    writeln!(out, "{}\n", filter.map_or("ALL TASKS", ListFilter::title))?;
    write_table(out, &tasks)?;
    Ok(())
}

/// Print a shell completion script.
pub fn cmd_completions(shell: Shell, out: &mut impl Write) -> Result<(), Error> {
    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, out);
    Ok(())
}
