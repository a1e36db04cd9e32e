// Serialized form of the task collection

use crate::task::Task;
use eyre::{Context, Result, eyre};
use std::collections::HashSet;

/// Encode the full collection as a JSON array, preserving order
pub fn encode(tasks: &[Task]) -> Result<String> {
    serde_json::to_string(tasks).context("Failed to serialize tasks")
}

/// Decode a JSON array of tasks
///
/// The blob is rejected as a whole if it does not parse, if any stored title
/// is blank, or if an id appears twice.
pub fn decode(raw: &str) -> Result<Vec<Task>> {
    let tasks: Vec<Task> = serde_json::from_str(raw).context("Failed to parse task collection")?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for (index, task) in tasks.iter().enumerate() {
        if task.title.trim().is_empty() {
            return Err(eyre!("Task at index {} has an empty title", index));
        }
        if !seen.insert(task.id.as_str()) {
            return Err(eyre!("Duplicate task id: {}", task.id));
        }
    }

    Ok(tasks)
}
