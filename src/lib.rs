// tasklist - task collection with filtering, search and pluggable local persistence

pub mod backend;
pub mod codec;
pub mod config;
pub mod filter;
pub mod stats;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use backend::{Backend, FileBackend, MemoryBackend, SqliteBackend};
pub use config::{BackendKind, Config, DefaultPriority};
pub use filter::{Query, StatusFilter, filter_by_status, search};
pub use stats::{Counts, overdue_on};
pub use store::TaskStore;
pub use task::{Priority, Task, TaskStatus, now_ms, today};
