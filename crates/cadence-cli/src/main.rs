use cadence_core::db;
use cadence_core::error::{CoreError, EvalError, NextDateError};
use cadence_core::repository::SqliteRepository;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod auth;
mod cli;
mod commands;
mod config;
mod parser;
mod server;
mod util;
mod views;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    // Diagnostics go to stderr so that command output stays clean.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter.as_str().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Pure computation, no database needed.
    if let cli::Commands::NextDate(command) = cli.command {
        if let Err(e) = commands::next_date::print_next_date(command) {
            handle_error(e);
            std::process::exit(1);
        }
        return;
    }

    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    let repository = SqliteRepository::new(db_pool);

    let result = match cli.command {
        cli::Commands::Add(command) => commands::add::add_task(&repository, command).await,
        cli::Commands::List(command) => {
            commands::list::list_tasks(&repository, command, &config).await
        }
        cli::Commands::Show(command) => commands::show::show_task(&repository, command).await,
        cli::Commands::Edit(command) => commands::edit::edit_task(&repository, command).await,
        cli::Commands::Done(command) => commands::done::done_task(&repository, command).await,
        cli::Commands::Delete(command) => {
            commands::delete::delete_task(&repository, command).await
        }
        cli::Commands::Serve(command) => {
            let listen = command
                .listen
                .unwrap_or_else(|| config.listen_address.clone());
            server::serve(repository, &listen, &config).await
        }
        cli::Commands::NextDate(_) => Ok(()),
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} Not found: {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(tasks) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, title) in tasks {
                    eprintln!("  {} ({})", id.yellow(), title);
                }
            }
            CoreError::Rule(e) => {
                eprintln!("{} Invalid rule: {}", "Error:".style(error_style), e);
            }
            CoreError::Evaluation(EvalError::NoCandidateFound(months)) => {
                eprintln!(
                    "{} The rule has no occurrence in the next {} months",
                    "Error:".style(error_style),
                    months.yellow()
                );
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), core_error),
        }
    } else if let Some(next_date_error) = err.downcast_ref::<NextDateError>() {
        eprintln!("{} {}", "Error:".style(error_style), next_date_error);
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
