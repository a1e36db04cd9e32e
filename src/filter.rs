// Read-only views over the task collection

use crate::task::{Task, TaskStatus};
use std::fmt;
use std::str::FromStr;

/// Status-based view selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => task.status == TaskStatus::Pending,
            StatusFilter::Completed => task.status == TaskStatus::Completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Completed => "completed",
        };
        f.write_str(s)
    }
}

impl FromStr for StatusFilter {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(eyre::eyre!("Unknown filter: {} (expected all, pending or completed)", other)),
        }
    }
}

/// Case-insensitive substring match on the title; an empty needle matches all
pub fn title_matches(task: &Task, needle: &str) -> bool {
    needle.is_empty() || task.title.to_lowercase().contains(&needle.to_lowercase())
}

/// Status filter and text search, ANDed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub status: StatusFilter,
    pub search: String,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.status.matches(task) && title_matches(task, &self.search)
    }

    /// Matching tasks in source order
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Tasks with the given status selector, in source order
pub fn filter_by_status(tasks: &[Task], status: StatusFilter) -> Vec<&Task> {
    Query::new().status(status).apply(tasks)
}

/// Tasks whose title contains `needle`, ignoring case, in source order
pub fn search<'a>(tasks: &'a [Task], needle: &str) -> Vec<&'a Task> {
    Query::new().search(needle).apply(tasks)
}
