//! taskpad command-line entry point.
//!
//! # Responsibility
//! - Parse the invocation, bootstrap logging, open the database.
//! - Translate one-shot subcommands into store intents and render results.
//!
//! # Invariants
//! - Snapshot write failures never abort the process; the in-memory store
//!   stays authoritative and the failure is reported once.

use clap::{Parser, Subcommand};
use log::debug;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use taskpad_core::db::open_db;
use taskpad_core::{
    default_log_level, init_logging, Applied, Intent, SnapshotRepository, SortMode,
    SqliteSnapshotRepository, TaskStore,
};

mod shell;

/// Single-list task manager backed by SQLite.
#[derive(Parser)]
#[command(name = "taskpad", version = taskpad_core::core_version(), about)]
struct Cli {
    /// Database file backing the task list.
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        default_value = "taskpad.sqlite3"
    )]
    db: PathBuf,

    /// Directory for rolling log files; logging stays off without it.
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a task.
    Add {
        /// Task text; multiple words are joined with single spaces.
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// List tasks, optionally filtered and sorted.
    List {
        /// Keep only titles containing this text (case-insensitive).
        #[arg(long, short, value_name = "TEXT")]
        search: Option<String>,
        /// Sort order: default|alphabetical|date.
        #[arg(long, value_name = "MODE")]
        sort: Option<String>,
    },
    /// Toggle a task's completion flag.
    Done { id: u64 },
    /// Replace a task's text.
    Edit {
        id: u64,
        /// New task text; multiple words are joined with single spaces.
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// Delete a task.
    Rm { id: u64 },
    /// Start the interactive shell.
    Shell,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or_else(default_log_level);
        if let Err(message) = bootstrap_logging(level, dir) {
            eprintln!("logging disabled: {message}");
        }
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let mut conn = open_db(&cli.db)?;
    let repo = SqliteSnapshotRepository::try_new(&mut conn)?;
    let mut store = TaskStore::open(repo)?;
    debug!(
        "event=cli_open module=cli status=ok db={} count={}",
        cli.db.display(),
        store.tasks().len()
    );

    match cli.command {
        Command::Add { title } => {
            let title = title.join(" ");
            match dispatch(&mut store, Intent::Add { title }) {
                Applied::Ignored => println!("nothing added: title is blank"),
                _ => render(&store),
            }
        }
        Command::List { search, sort } => {
            if let Some(keyword) = search {
                dispatch(&mut store, Intent::SetSearch { keyword });
            }
            if let Some(raw) = sort {
                let Some(mode) = SortMode::parse(&raw) else {
                    eprintln!("unknown sort mode `{raw}`; expected default|alphabetical|date");
                    return Ok(ExitCode::FAILURE);
                };
                dispatch(&mut store, Intent::SetSort { mode });
            }
            render(&store);
        }
        Command::Done { id } => match dispatch(&mut store, Intent::ToggleCompleted { id }) {
            Applied::Ignored => println!("no task with id {id}"),
            _ => render(&store),
        },
        Command::Edit { id, title } => {
            if dispatch(&mut store, Intent::BeginEdit { id }) == Applied::Ignored {
                println!("no task with id {id}");
            } else {
                let title = title.join(" ");
                dispatch(&mut store, Intent::SetDraft { title });
                dispatch(&mut store, Intent::CommitEdit);
                render(&store);
            }
        }
        Command::Rm { id } => match dispatch(&mut store, Intent::Delete { id }) {
            Applied::Ignored => println!("no task with id {id}"),
            _ => render(&store),
        },
        Command::Shell => shell::run(&mut store)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn bootstrap_logging(level: &str, dir: &Path) -> Result<(), String> {
    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|err| format!("cannot resolve current directory: {err}"))?
            .join(dir)
    };
    let dir_str = absolute
        .to_str()
        .ok_or_else(|| format!("log directory `{}` is not valid UTF-8", absolute.display()))?;
    init_logging(level, dir_str)
}

/// Applies one intent, downgrading a snapshot write failure to a notice.
///
/// A write error can only follow a sequence mutation, so the caller still
/// sees `Mutated`; the store keeps the change in memory.
pub(crate) fn dispatch<R: SnapshotRepository>(
    store: &mut TaskStore<R>,
    intent: Intent,
) -> Applied {
    match store.apply(intent) {
        Ok(applied) => applied,
        Err(err) => {
            eprintln!("warning: could not write snapshot ({err}); changes kept in memory");
            Applied::Mutated
        }
    }
}

pub(crate) fn render<R: SnapshotRepository>(store: &TaskStore<R>) {
    let visible = store.visible_tasks();
    if visible.is_empty() {
        println!("(no tasks)");
        return;
    }
    for task in visible {
        let mark = if task.completed { "x" } else { " " };
        println!("{:>4} [{mark}] {}", task.id, task.title);
    }
}
