// Derived counts and progress, recomputed on demand

use crate::task::{Priority, Task, TaskStatus};

/// Tallies over a task collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    /// Pending tasks with high priority
    pub high_priority_pending: usize,
}

impl Counts {
    pub fn of(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut counts, task| {
            counts.total += 1;
            match task.status {
                TaskStatus::Pending => {
                    counts.pending += 1;
                    if task.priority == Some(Priority::High) {
                        counts.high_priority_pending += 1;
                    }
                }
                TaskStatus::Completed => counts.completed += 1,
            }
            counts
        })
    }

    /// Completed share of all tasks; `None` for an empty collection
    pub fn progress(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.completed as f64 / self.total as f64)
    }

    /// Progress as a whole percentage, rounded half up
    pub fn progress_percent(&self) -> Option<u8> {
        self.progress().map(|ratio| (ratio * 100.0).round() as u8)
    }
}

/// Pending tasks whose due date has passed on `today`
pub fn overdue_on(tasks: &[Task], today: chrono::NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| t.is_overdue_on(today)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(status: TaskStatus, priority: Option<Priority>) -> Task {
        let mut task = Task::new("t", priority, None).unwrap();
        task.status = status;
        task
    }

    #[test]
    fn test_counts() {
        let tasks = vec![
            task(TaskStatus::Pending, Some(Priority::High)),
            task(TaskStatus::Pending, Some(Priority::Low)),
            task(TaskStatus::Pending, None),
            task(TaskStatus::Completed, Some(Priority::High)),
        ];

        let counts = Counts::of(&tasks);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.pending, 3);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.high_priority_pending, 1);
    }

    #[test]
    fn test_progress_one_of_three() {
        let tasks = vec![
            task(TaskStatus::Completed, None),
            task(TaskStatus::Pending, None),
            task(TaskStatus::Pending, None),
        ];

        let counts = Counts::of(&tasks);
        let ratio = counts.progress().unwrap();
        assert!((ratio - 1.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(counts.progress_percent(), Some(33));
    }

    #[test]
    fn test_progress_rounds_half_up() {
        let tasks = vec![
            task(TaskStatus::Completed, None),
            task(TaskStatus::Completed, None),
            task(TaskStatus::Pending, None),
        ];
        assert_eq!(Counts::of(&tasks).progress_percent(), Some(67));
    }

    #[test]
    fn test_progress_empty_is_none() {
        let counts = Counts::of(&[]);
        assert_eq!(counts, Counts::default());
        assert!(counts.progress().is_none());
        assert!(counts.progress_percent().is_none());
    }

    #[test]
    fn test_overdue_on() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let yesterday = today.pred_opt().unwrap();

        let late = Task::new("late", None, Some(yesterday)).unwrap();
        let mut done = Task::new("done", None, Some(yesterday)).unwrap();
        done.status = TaskStatus::Completed;
        let current = Task::new("current", None, Some(today)).unwrap();

        let tasks = vec![late.clone(), done, current];
        let overdue = overdue_on(&tasks, today);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, late.id);
    }
}
