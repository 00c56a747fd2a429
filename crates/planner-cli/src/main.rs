use clap::Parser;
use owo_colors::{OwoColorize, Style};
use planner_core::db;
use planner_core::error::{CoreError, ValidationError};
use planner_core::lifecycle::TaskService;
use planner_core::repository::SqliteRepository;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod util;
mod views;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let config = match config::Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.log_level);
    debug!(?config, "loaded configuration");

    if let Err(e) = run(cli.command, &config).await {
        handle_error(e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so that stdout stays parseable (`list --json`, `next`).
fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: cli::Commands, config: &config::Config) -> anyhow::Result<()> {
    // The date calculator never needs storage.
    if let cli::Commands::Next(command) = &command {
        return commands::next::next_occurrence(command);
    }

    let pool = db::establish_connection(&config.database_path).await?;
    let service = TaskService::new(SqliteRepository::new(pool));

    match command {
        cli::Commands::Add(command) => commands::add::add_task(&service, command).await,
        cli::Commands::List(command) => commands::list::list_tasks(&service, command, config).await,
        cli::Commands::Show(command) => commands::show::show_task(&service, command).await,
        cli::Commands::Edit(command) => commands::edit::edit_task(&service, command).await,
        cli::Commands::Done(command) => commands::done::done_task(&service, command).await,
        cli::Commands::Delete(command) => commands::delete::delete_task(&service, command).await,
        cli::Commands::Next(command) => commands::next::next_occurrence(&command),
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(_) => {
                eprintln!("{} {}", "Error:".style(error_style), core_error);
            }
            CoreError::AmbiguousId(tasks) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, title) in tasks {
                    eprintln!("  {} ({})", id.yellow(), title);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::Validation(e) => print_validation_error(e),
            CoreError::Conflict(id) => {
                eprintln!(
                    "{} Task {} was changed by another process. Run the command again.",
                    "Error:".style(error_style),
                    id.yellow()
                );
            }
            _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
        }
    } else if let Some(validation_error) = err.downcast_ref::<ValidationError>() {
        print_validation_error(validation_error);
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}

fn print_validation_error(err: &ValidationError) {
    eprintln!("{} {}", "Invalid:".red().bold(), err);
    if !matches!(err, ValidationError::InvalidDateFormat(_)) {
        eprintln!("  Directives are 'y' (yearly) or 'd N' (every N days, 1 to 366).");
    }
}
