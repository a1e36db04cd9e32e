//! CLI argument parsing for tasklist.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasklist::{BackendKind, StatusFilter};

#[derive(Parser)]
#[command(
    name = "tasklist",
    about = "Task list with filtering, search and local persistence",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/tasklist/logs/tasklist.log"
)]
pub struct Cli {
    /// Root directory of the task store (default: from config, else current directory)
    #[arg(short, long, global = true)]
    pub store_path: Option<PathBuf>,

    /// Path to the config file (default: ~/.config/tasklist/tasklist.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend (overrides config)
    #[arg(short, long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Priority (low, medium, high, none)
        #[arg(short, long)]
        priority: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
    },

    /// List tasks
    List {
        /// Status filter (all, pending, completed)
        #[arg(short, long, default_value = "all")]
        filter: StatusFilter,

        /// Case-insensitive title search
        #[arg(short = 'q', long, default_value = "")]
        search: String,
    },

    /// Toggle a task between pending and completed
    Toggle {
        /// Task ID or unique prefix
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task ID or unique prefix
        id: String,
    },

    /// Show counts and overall progress
    Stats,
}
