use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use tracing::Level;

use crate::cmd::Commands;
use crate::db::DEFAULT_DB;

/// Usage text printed with no command and after any argument error.
pub const HELP_MESSAGE: &str = "\
Task Tracker CLI

Commands:
    task-cli add <\"task description\">
    task-cli update <task_id> <\"task description\">
    task-cli delete <task_id>

    task-cli mark-in-progress <task_id>
    task-cli mark-done <task_id>

    task-cli list

    task-cli list done
    task-cli list todo
    task-cli list in-progress

    task-cli completions <shell>
";

/// Simple, file-backed task tracker CLI.
/// Storage defaults to ./tasks.json or a path passed via --db.
#[derive(Parser, Debug)]
#[command(
    name = "task-cli",
    version,
    about = "Single-user task tracker",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Path to the JSON task store.
    #[arg(long, global = true, default_value = DEFAULT_DB)]
    pub db: PathBuf,

    /// Increase log verbosity on stderr. May be repeated.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Log level selected by the number of `-v` flags.
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::INFO,
            3 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

/// Result of reading the command line.
#[derive(Debug)]
pub enum Invocation {
    /// Arguments matched a command (or no command was given).
    Run(Cli),
    /// `--help` or `--version`: clap's rendered text, printed as is.
    Info(String),
    /// Unknown command, wrong argument count or bad filter word.
    CommandError,
}

/// Parse arguments without exiting the process on failure.
pub fn parse_args<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Invocation::Run(cli),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Invocation::Info(e.to_string()),
            _ => Invocation::CommandError,
        },
    }
}
