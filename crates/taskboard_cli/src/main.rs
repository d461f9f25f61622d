//! Command-line front end for the task board.
//!
//! # Responsibility
//! - Map subcommands onto `BoardStore` mutations against the board file.
//! - Print the rendered board (or its JSON) after each command.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use taskboard_core::config::{resolve_data_file, resolve_log_dir, DATA_FILE_ENV, LOG_DIR_ENV};
use taskboard_core::{
    default_log_level, init_logging, Board, BoardStore, JsonFileStorage, OpenReport, StoreError,
    StoreResult,
};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Single-user task board", long_about = None)]
struct Cli {
    /// Board file to operate on.
    #[arg(long, global = true, env = DATA_FILE_ENV)]
    data_file: Option<PathBuf>,
    /// Write rolling log files.
    #[arg(long, global = true)]
    log: bool,
    /// Log directory used with `--log`.
    #[arg(long, global = true, env = LOG_DIR_ENV)]
    log_dir: Option<PathBuf>,
    /// Log level used with `--log`.
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the board
    Show(ShowArgs),
    /// Manage columns
    Column {
        #[command(subcommand)]
        action: ColumnCommand,
    },
    /// Manage tasks
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },
}

#[derive(Args)]
struct ShowArgs {
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
#[command(rename_all = "kebab-case")]
enum ColumnCommand {
    Add {
        title: String,
    },
    Rename {
        id: String,
        title: String,
    },
    #[command(alias = "rm")]
    Delete {
        id: String,
    },
    /// Move a column to the position currently held by `target`.
    Move {
        id: String,
        target: String,
    },
}

#[derive(Subcommand)]
#[command(rename_all = "kebab-case")]
enum TaskCommand {
    Add {
        text: String,
        #[arg(long, default_value = "new")]
        column: String,
        #[arg(long, alias = "desc", default_value = "")]
        description: String,
    },
    Edit {
        id: String,
        text: String,
        #[arg(long, alias = "desc", default_value = "")]
        description: String,
    },
    #[command(alias = "rm")]
    Delete {
        id: String,
    },
    /// Move to another column, keeping the task's order value.
    Move {
        id: String,
        column: String,
    },
    /// Place a task at a position (0-based) within a column.
    Drop {
        id: String,
        column: String,
        index: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log {
        let mut log_dir = resolve_log_dir(cli.log_dir.as_deref());
        if log_dir.is_relative() {
            log_dir = std::env::current_dir()?.join(log_dir);
        }
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir).context("failed to start logging")?;
    }

    let data_file = resolve_data_file(cli.data_file.as_deref());
    let (mut store, report) = BoardStore::open(JsonFileStorage::new(&data_file));
    report_open(&report, &data_file);

    match cli.command {
        Commands::Show(args) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(store.state())?);
            } else {
                print_board(store.state());
            }
            return Ok(());
        }
        Commands::Column { action } => match action {
            ColumnCommand::Add { title } => {
                let column = finish(store.add_column(&title))?;
                if let Some(column) = column {
                    println!("added column {}", column.id);
                }
            }
            ColumnCommand::Rename { id, title } => {
                report_change(finish(store.rename_column(&id, &title))?)
            }
            ColumnCommand::Delete { id } => report_change(finish(store.delete_column(&id))?),
            ColumnCommand::Move { id, target } => {
                report_change(finish(store.reorder_columns(&id, &target))?)
            }
        },
        Commands::Task { action } => match action {
            TaskCommand::Add {
                text,
                column,
                description,
            } => match finish(store.add_task(&text, &description, &column))? {
                Some(Some(task)) => println!("added task {}", task.id),
                Some(None) => bail!("column `{column}` does not exist"),
                None => {}
            },
            TaskCommand::Edit {
                id,
                text,
                description,
            } => report_change(finish(store.update_task(&id, &text, &description))?),
            TaskCommand::Delete { id } => report_change(finish(store.delete_task(&id))?),
            TaskCommand::Move { id, column } => {
                report_change(finish(store.move_task(&id, &column))?)
            }
            TaskCommand::Drop { id, column, index } => {
                report_change(finish(store.drop_task(&id, &column, index))?)
            }
        },
    }

    print_board(store.state());
    Ok(())
}

/// Surfaces write failures as warnings; the in-memory state still changed.
///
/// Returns `None` when the mutation was applied but not persisted.
fn finish<T>(result: StoreResult<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err @ StoreError::Persistence(_)) => {
            eprintln!("warning: {err}");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn report_change(changed: Option<bool>) {
    if changed == Some(false) {
        println!("nothing changed");
    }
}

fn report_open(report: &OpenReport, data_file: &std::path::Path) {
    if let Some(err) = &report.load_error {
        eprintln!(
            "warning: could not load {}, using default board: {err}",
            data_file.display()
        );
    }
    if let Some(err) = &report.persist_error {
        eprintln!("warning: board not saved: {err}");
    }
    if report.dropped > 0 || report.repaired > 0 {
        eprintln!(
            "note: upgraded board ({}), dropped={} repaired={}",
            report.shape.as_str(),
            report.dropped,
            report.repaired
        );
    }
}

fn print_board(board: &Board) {
    for column in &board.columns {
        println!(
            "## {} [{}] ({})",
            column.title,
            column.id,
            board.task_count(&column.id)
        );
        for task in board.tasks_in_column(&column.id) {
            println!("- {} ({})", task.text, task.id);
            if !task.description.is_empty() {
                println!("  {}", task.description);
            }
        }
    }
}
