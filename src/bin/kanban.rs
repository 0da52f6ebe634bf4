//! Command-line front end for the task board.
//!
//! Usage:
//!
//! ```text
//! kanban [--config PATH] [--database-url URL] [--policy POLICY] <command>
//! ```
//!
//! Commands print JSON on stdout and log to stderr. The process exit code
//! reflects the failure class: `2` for invalid input, `3` when a task or
//! column is missing, `4` for a rejected move, and `1` for anything else.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use kanban::board::adapters::postgres::PostgresBoardStore;
use kanban::board::domain::{Board, Column, MovePolicy};
use kanban::board::ports::{BoardStore, BoardStoreError};
use kanban::board::services::{
    CreateTaskRequest, ErrorKind, MoveTaskRequest, OrderingEngine, OrderingError,
};
use kanban::config::{BoardConfig, ConfigError};
use kanban::telemetry;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Task board with gap-free ordering.
#[derive(Parser, Debug)]
#[command(name = "kanban", version, about, long_about = None)]
struct Cli {
    /// JSON configuration file; the environment is used when absent
    #[arg(long, value_name = "PATH", env = "KANBAN_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// `PostgreSQL` URL overriding the configured one
    #[arg(long, value_name = "URL")]
    database_url: Option<String>,

    /// Move policy overriding the configured one
    #[arg(long, value_parser = parse_policy)]
    policy: Option<MovePolicy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// Create the schema and seed the default columns
    Init,

    /// Print every column and task
    Board,

    /// Append a task to a column
    Create {
        /// Column receiving the task
        #[arg(long, value_parser = parse_positive_id)]
        column: i64,

        /// Task title
        title: String,
    },

    /// Relocate a task to a column and slot
    Move {
        /// Task to move
        #[arg(value_parser = parse_positive_id)]
        task: i64,

        /// Destination column
        #[arg(value_parser = parse_positive_id)]
        column: i64,

        /// Requested slot; out-of-range values are clamped
        #[arg(long, allow_negative_numbers = true)]
        ord: Option<f64>,
    },

    /// Move a task to the end of the next column
    Advance {
        /// Task to advance
        #[arg(value_parser = parse_positive_id)]
        task: i64,
    },

    /// Renumber one column to 1..=N
    Normalize {
        /// Column to renumber
        #[arg(value_parser = parse_positive_id)]
        column: i64,
    },

    /// Report columns whose ordinals are not 1..=N
    Verify,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] BoardStoreError),

    #[error(transparent)]
    Ordering(#[from] OrderingError),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("{0} column(s) are not densely ordered")]
    NotDense(usize),
}

impl CliError {
    const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Ordering(err) => match err.kind() {
                ErrorKind::InvalidArgument => 2,
                ErrorKind::NotFound => 3,
                ErrorKind::Conflict => 4,
                ErrorKind::Internal => 1,
            },
            Self::Store(_) | Self::Encode(_) | Self::Output(_) | Self::NotDense(_) => 1,
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Ordering(err) => err.client_message(),
            Self::Store(_) => "internal error".to_owned(),
            other => other.to_string(),
        }
    }
}

fn parse_positive_id(raw: &str) -> Result<i64, String> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("'{raw}' is not a positive integer")),
    }
}

fn parse_policy(raw: &str) -> Result<MovePolicy, String> {
    MovePolicy::try_from(raw).map_err(|err| err.to_string())
}

fn load_config(cli: &Cli) -> Result<BoardConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => BoardConfig::from_json_file(path)?,
        None => BoardConfig::from_env()?,
    };
    if let Some(url) = &cli.database_url {
        config.database_url = Some(url.clone());
    }
    if let Some(policy) = cli.policy {
        config.move_policy = policy;
    }
    Ok(config)
}

fn emit(value: &serde_json::Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Describes every column that is not densely ordered, by id and name.
fn density_report(board: &Board) -> Vec<serde_json::Value> {
    board
        .check_density()
        .into_iter()
        .map(|violation| {
            json!({
                "column": violation.column,
                "name": board.column(violation.column).map(Column::name),
                "ordinals": violation.ordinals,
            })
        })
        .collect()
}

async fn run(command: Command, config: &BoardConfig) -> Result<(), CliError> {
    let store = PostgresBoardStore::connect(config.database_url()?, config.pool_size)?;
    let engine = OrderingEngine::new(Arc::new(store)).with_policy(config.move_policy);
    match command {
        Command::Init => {
            engine.store().initialize().await?;
            emit(&json!({ "initialized": true }))
        }
        Command::Board => emit(&serde_json::to_value(engine.list_board().await?)?),
        Command::Create { column, title } => {
            let task = engine
                .create_task(CreateTaskRequest::new(column, title))
                .await?;
            emit(&serde_json::to_value(task)?)
        }
        Command::Move { task, column, ord } => {
            let append = MoveTaskRequest::new(task, column);
            let request = match ord {
                Some(hint) => append.with_target(hint),
                None => append,
            };
            emit(&serde_json::to_value(engine.move_task(request).await?)?)
        }
        Command::Advance { task } => {
            emit(&serde_json::to_value(engine.advance_task(task).await?)?)
        }
        Command::Normalize { column } => {
            let rewritten = engine.normalize_column(column).await?;
            emit(&json!({ "column": column, "rewritten": rewritten }))
        }
        Command::Verify => {
            let violations = density_report(&engine.list_board().await?);
            emit(&json!({ "violations": violations }))?;
            if violations.is_empty() {
                Ok(())
            } else {
                Err(CliError::NotDense(violations.len()))
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            telemetry::init_subscriber("info");
            error!(error = %err, "failed to load configuration");
            return ExitCode::from(CliError::from(err).exit_code());
        }
    };
    telemetry::init_subscriber(&config.log_level);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            let reported = emit(&json!({ "error": err.client_message() }));
            if let Err(output_err) = reported {
                error!(error = %output_err, "failed to report error");
            }
            ExitCode::from(err.exit_code())
        }
    }
}
