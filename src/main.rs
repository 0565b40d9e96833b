mod backend;
mod cli;
mod commands;
mod config;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: cli.config,
    };

    match run(&ctx, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui::error(&format!("{err:#}"));
            if let Some(advice) = advice(&err) {
                ui::dim(advice);
            }
            exit_code(&err)
        }
    }
}

fn run(ctx: &Context, command: Command) -> Result<()> {
    match command {
        Command::Query(args) => commands::domain::query(ctx, args),
        Command::Present(args) => commands::domain::present(ctx, args),
        Command::Absent(args) => commands::domain::absent(ctx, args),
        Command::Config(cmd) => commands::config::run(ctx, cmd),
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "physdom", &mut io::stdout());
            Ok(())
        }
    }
}

/// 2 for an incomplete request, 1 for anything else
fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<declarative::Error>() {
        Some(e) if e.category() == declarative::ErrorCategory::Usage => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

/// Advice for orchestrator failures, wherever they sit in the error chain
fn advice(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ndo::Error>())
        .map(|e| e.category().advice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_exits_with_usage_code() {
        let err = anyhow::Error::new(declarative::Error::MissingRequiredField {
            state: "present",
            field: "name",
        });
        assert_eq!(exit_code(&err), ExitCode::from(2));
    }

    #[test]
    fn test_advice_for_wrapped_client_errors() {
        let login = anyhow::Error::new(ndo::Error::LoginFailed {
            user: "admin".to_string(),
            message: "HTTP 401".to_string(),
        })
        .context("Could not log in to nd.local");
        assert_eq!(advice(&login), Some(ndo::ErrorCategory::Auth.advice()));

        let transport = anyhow::Error::new(declarative::Error::transport(ndo::Error::http(
            "HTTP 500: internal error",
            Some(500),
        )));
        assert_eq!(advice(&transport), Some(ndo::ErrorCategory::Network.advice()));

        assert_eq!(advice(&anyhow::anyhow!("boom")), None);
    }

    #[test]
    fn test_other_errors_exit_with_failure() {
        let err = anyhow::Error::new(declarative::Error::transport("HTTP 503"));
        assert_eq!(exit_code(&err), ExitCode::FAILURE);
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), ExitCode::FAILURE);
    }
}
