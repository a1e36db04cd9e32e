// Task store: in-memory collection kept in lockstep with a backend

use crate::backend::Backend;
use crate::codec;
use crate::task::{Priority, Task};
use chrono::NaiveDate;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

/// Authoritative task collection, newest first
///
/// Every mutation is computed on a copy, persisted, and only then committed
/// to memory, so a failed write leaves both sides as they were.
pub struct TaskStore<B: Backend> {
    backend: B,
    tasks: Vec<Task>,
}

impl<B: Backend> TaskStore<B> {
    /// Wrap a backend and load whatever it holds
    pub fn open(backend: B) -> Self {
        let mut store = Self {
            backend,
            tasks: Vec::new(),
        };
        store.tasks = store.load();
        store
    }

    /// Read the persisted collection
    ///
    /// Never fails: a missing, unreadable, or malformed blob yields an empty
    /// collection.
    pub fn load(&self) -> Vec<Task> {
        let raw = match self.backend.read_raw() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("load: backend is empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = ?e, "Failed to read backend, starting empty");
                return Vec::new();
            }
        };

        if raw.trim().is_empty() {
            return Vec::new();
        }

        match codec::decode(&raw) {
            Ok(tasks) => {
                info!(count = tasks.len(), "Loaded tasks");
                tasks
            }
            Err(e) => {
                warn!(error = ?e, "Stored tasks are malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Replace the persisted collection and the in-memory one with `tasks`
    pub fn save(&mut self, tasks: &[Task]) -> Result<()> {
        self.persist(tasks)?;
        self.tasks = tasks.to_vec();
        Ok(())
    }

    /// Current collection
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Create a task and put it at the front of the collection
    ///
    /// Returns `Ok(None)` without touching anything when the title is blank.
    pub fn create(&mut self, title: &str, priority: Option<Priority>, due_date: Option<NaiveDate>) -> Result<Option<Task>> {
        let Some(mut task) = Task::new(title, priority, due_date) else {
            debug!("create: rejected blank title");
            return Ok(None);
        };

        // v7 ids are time-ordered; regenerate on the off chance of a clash
        while self.get(&task.id).is_some() {
            task.id = uuid::Uuid::now_v7().to_string();
        }

        let mut next = Vec::with_capacity(self.tasks.len() + 1);
        next.push(task.clone());
        next.extend(self.tasks.iter().cloned());

        self.commit(next)?;
        debug!(id = %task.id, "create: added task");
        Ok(Some(task))
    }

    /// Flip a task between pending and completed; unknown ids are a no-op
    pub fn toggle_status(&mut self, id: &str) -> Result<&[Task]> {
        if self.get(id).is_none() {
            debug!(id, "toggle_status: no such task");
            return Ok(&self.tasks);
        }

        let next: Vec<Task> = self
            .tasks
            .iter()
            .map(|t| {
                if t.id == id {
                    let mut t = t.clone();
                    t.status = t.status.toggled();
                    t
                } else {
                    t.clone()
                }
            })
            .collect();

        self.commit(next)?;
        debug!(id, "toggle_status: toggled");
        Ok(&self.tasks)
    }

    /// Remove a task permanently; unknown ids are a no-op
    pub fn delete(&mut self, id: &str) -> Result<&[Task]> {
        if self.get(id).is_none() {
            debug!(id, "delete: no such task");
            return Ok(&self.tasks);
        }

        let next: Vec<Task> = self.tasks.iter().filter(|t| t.id != id).cloned().collect();

        self.commit(next)?;
        debug!(id, "delete: removed");
        Ok(&self.tasks)
    }

    fn commit(&mut self, next: Vec<Task>) -> Result<()> {
        self.persist(&next)?;
        self.tasks = next;
        Ok(())
    }

    fn persist(&mut self, tasks: &[Task]) -> Result<()> {
        let raw = codec::encode(tasks)?;
        self.backend.write_raw(&raw).context("Failed to save tasks")?;
        info!(count = tasks.len(), "Saved tasks");
        Ok(())
    }
}
