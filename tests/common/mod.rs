//! Shared test infrastructure for tasklist integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use tasklist::{MemoryBackend, Priority, Task, TaskStore};

/// Store over an in-memory backend.
pub struct TestEnv {
    pub store: TaskStore<MemoryBackend>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            store: TaskStore::open(MemoryBackend::new()),
        }
    }

    /// Create a task with no priority and no due date.
    pub fn create(&mut self, title: &str) -> Task {
        self.create_full(title, None, None)
    }

    pub fn create_with_priority(&mut self, title: &str, priority: Priority) -> Task {
        self.create_full(title, Some(priority), None)
    }

    pub fn create_full(&mut self, title: &str, priority: Option<Priority>, due: Option<NaiveDate>) -> Task {
        self.store
            .create(title, priority, due)
            .expect("Failed to create task")
            .expect("Title was rejected")
    }

    pub fn toggle(&mut self, task: &Task) {
        self.store.toggle_status(&task.id).expect("Failed to toggle task");
    }

    pub fn delete(&mut self, task: &Task) {
        self.store.delete(&task.id).expect("Failed to delete task");
    }

    /// Reopen a fresh store over the same persisted blob, as a new session would.
    pub fn reopen(&self) -> TaskStore<MemoryBackend> {
        TaskStore::open(self.store.backend().clone())
    }

    pub fn ids(&self) -> Vec<String> {
        self.store.tasks().iter().map(|t| t.id.clone()).collect()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
