//! Statistics over a task list.
//!
//! Both functions are pure. [`detailed_stats`] takes "now" as a parameter so
//! that overdue and due-today counts are reproducible.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{Priority, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// Percentage of completed tasks, rounded; 0 for an empty list.
    pub completion_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
        }
    }

    fn bump(&mut self, priority: Priority) {
        match priority {
            Priority::Low => self.low += 1,
            Priority::Medium => self.medium += 1,
            Priority::High => self.high += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedStats {
    #[serde(flatten)]
    pub summary: TaskStats,
    pub by_priority: PriorityCounts,
    pub by_category: BTreeMap<String, usize>,
    pub overdue: usize,
    pub due_today: usize,
}

/// Where a pending task's due date falls relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueState {
    Overdue,
    DueToday,
}

/// Classifies one task against `now`.
///
/// A pending task due before `now` is overdue; otherwise, if it is due on
/// `now`'s calendar day (in `now`'s timezone), it is due today. Completed and
/// undated tasks are neither.
pub fn due_state<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> Option<DueState> {
    let due = task.due_date?;
    if task.is_overdue_at(now.with_timezone(&Utc)) {
        Some(DueState::Overdue)
    } else if !task.is_completed && due.with_timezone(&now.timezone()).date_naive() == now.date_naive() {
        Some(DueState::DueToday)
    } else {
        None
    }
}

pub fn stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.is_completed).count();
    let completion_rate = if total > 0 {
        (completed as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };

    TaskStats {
        total,
        completed,
        active: total - completed,
        completion_rate,
    }
}

/// Summary counts plus per-priority and per-category buckets and due-date
/// counts, the latter classified by [`due_state`].
pub fn detailed_stats<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> DetailedStats {
    let mut by_priority = PriorityCounts::default();
    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
    let mut overdue = 0;
    let mut due_today = 0;

    for task in tasks {
        by_priority.bump(task.priority);
        *by_category.entry(task.category.clone()).or_insert(0) += 1;

        match due_state(task, now) {
            Some(DueState::Overdue) => overdue += 1,
            Some(DueState::DueToday) => due_today += 1,
            None => {}
        }
    }

    DetailedStats {
        summary: stats(tasks),
        by_priority,
        by_category,
        overdue,
        due_today,
    }
}
