use std::io::{self, Write};
use std::process::ExitCode;

use tracing::Level;

use task_cli::cli::{parse_args, Invocation};
use task_cli::cmd::{cmd_command_error, dispatch};
use task_cli::error::Error;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Error> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let cli = match parse_args(std::env::args_os()) {
        Invocation::Run(cli) => cli,
        Invocation::Info(text) => {
            write!(out, "{text}")?;
            return Ok(());
        }
        Invocation::CommandError => return cmd_command_error(&mut out),
    };

    install_tracing(cli.log_level());
    dispatch(cli.command, &cli.db, &mut out)?;
    out.flush()?;
    Ok(())
}

fn install_tracing(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
