//! tasklist CLI - terminal front end for the task store.

use chrono::{Datelike, NaiveDate};
use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tasklist::{
    Backend, BackendKind, Config, Counts, FileBackend, Priority, Query, SqliteBackend, Task, TaskStatus, TaskStore,
    today,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasklist")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("tasklist.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn open_backend(kind: BackendKind, root: &Path) -> Result<Box<dyn Backend>> {
    let backend: Box<dyn Backend> = match kind {
        BackendKind::File => Box::new(FileBackend::open(root)?),
        BackendKind::Sqlite => Box::new(SqliteBackend::open(root)?),
    };
    Ok(backend)
}

fn parse_priority(value: Option<&str>, config: &Config) -> Result<Option<Priority>> {
    match value {
        None => Ok(config.default_priority.into()),
        Some(v) if v.trim().eq_ignore_ascii_case("none") => Ok(None),
        Some(v) => Ok(Some(v.parse()?)),
    }
}

fn parse_due(value: Option<&str>) -> Result<Option<NaiveDate>> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d")
                .map_err(|_| eyre!("Invalid due date: {} (expected YYYY-MM-DD)", v))
        })
        .transpose()
}

/// Resolve a full id or a unique id prefix against the collection
fn resolve_id(tasks: &[Task], needle: &str) -> Result<String> {
    if let Some(task) = tasks.iter().find(|t| t.id == needle) {
        return Ok(task.id.clone());
    }

    let matches: Vec<&Task> = tasks.iter().filter(|t| t.id.starts_with(needle)).collect();
    match matches.as_slice() {
        [] => Err(eyre!("No task with id {}", needle)),
        [task] => Ok(task.id.clone()),
        _ => Err(eyre!("Id prefix {} is ambiguous ({} tasks match)", needle, matches.len())),
    }
}

/// Short label for a due date: Today, Tomorrow, or e.g. "Mar 5"
fn due_label(due: NaiveDate, today: NaiveDate) -> String {
    if due == today {
        "Today".to_string()
    } else if Some(due) == today.succ_opt() {
        "Tomorrow".to_string()
    } else {
        format!("{} {}", due.format("%b"), due.day())
    }
}

/// First eight characters of an id, for display
fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

fn format_priority(priority: Option<Priority>) -> ColoredString {
    match priority {
        Some(Priority::High) => "high".red(),
        Some(Priority::Medium) => "medium".yellow(),
        Some(Priority::Low) => "low".green(),
        None => "-".dimmed(),
    }
}

fn render_task(task: &Task, today: NaiveDate) -> String {
    let marker = match task.status {
        TaskStatus::Completed => "[x]".green(),
        TaskStatus::Pending => "[ ]".normal(),
    };

    let title = if task.is_completed() {
        task.title.dimmed().strikethrough()
    } else {
        task.title.normal()
    };

    let mut line = format!(
        "{} {} {} {:<6}",
        marker,
        short_id(&task.id).cyan(),
        title,
        format_priority(task.priority)
    );

    if let Some(due) = task.due_date {
        let label = due_label(due, today);
        if task.is_overdue_on(today) {
            line.push_str(&format!(" {}", format!("due {} (Overdue)", label).red()));
        } else {
            line.push_str(&format!(" due {}", label));
        }
    }

    line
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.as_deref()).context("Failed to load config")?;

    let root = cli
        .store_path
        .clone()
        .or_else(|| config.store_dir.clone())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let kind = cli.backend.unwrap_or(config.backend);

    let backend = open_backend(kind, &root).context("Failed to open store")?;
    let mut store = TaskStore::open(backend);
    let today = today();

    match cli.command {
        Command::Add { title, priority, due } => {
            let priority = parse_priority(priority.as_deref(), &config)?;
            let due = parse_due(due.as_deref())?;

            match store.create(&title, priority, due).context("Failed to add task")? {
                Some(task) => println!("{} Added {}", "✓".green(), render_task(&task, today)),
                None => println!("{} Title is empty, nothing added", "!".yellow()),
            }
        }

        Command::List { filter, search } => {
            let query = Query::new().status(filter).search(search);
            let visible = query.apply(store.tasks());

            if visible.is_empty() {
                if store.tasks().is_empty() {
                    println!("No tasks yet. Add one to get started!");
                } else {
                    println!("No tasks found. Try a different search or filter.");
                }
            } else {
                for task in visible {
                    println!("{}", render_task(task, today));
                }
            }
        }

        Command::Toggle { id } => {
            let id = resolve_id(store.tasks(), &id)?;
            store.toggle_status(&id).context("Failed to toggle task")?;
            if let Some(task) = store.get(&id) {
                println!("{} {}", "✓".green(), render_task(task, today));
            }
        }

        Command::Delete { id } => {
            let id = resolve_id(store.tasks(), &id)?;
            store.delete(&id).context("Failed to delete task")?;
            println!("{} Deleted {}", "✓".green(), id);
        }

        Command::Stats => {
            let counts = Counts::of(store.tasks());
            println!("Pending:       {}", counts.pending.to_string().yellow());
            println!("Completed:     {}", counts.completed.to_string().green());
            println!("High priority: {}", counts.high_priority_pending.to_string().red());
            if let Some(percent) = counts.progress_percent() {
                println!("Progress:      {}%", percent);
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is best-effort; the tool still works without a writable data dir
    if let Err(e) = setup_logging() {
        eprintln!("{} {:#}", "warning:".yellow(), e);
    }

    run(cli)
}
