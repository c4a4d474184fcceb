//! # Display Indexes
//!
//! UUIDs are awkward to type, so the CLI addresses tasks by their position in
//! the canonical listing: the whole list, ordered by the user's sort settings,
//! numbered from 1.
//!
//! Indexes are canonical, not per-view. A filtered listing shows each task with
//! the same number it has in the unfiltered one, so `todoz done 3` means the
//! same task whatever was last displayed.
//!
//! ## Selectors
//!
//! - `3`: one index
//! - `2-5`: an inclusive range
//! - a full UUID
//! - `selected`: the session's selection set
//!
//! Resolving an index that does not exist is an error, unlike the repository,
//! which treats unknown UUIDs as no-ops.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Result, TodozError};
use crate::model::Task;
use crate::sort::{sort_tasks, SortField, SortOrder};

/// Token that addresses the current selection.
pub const SELECTED_TOKEN: &str = "selected";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTask {
    pub index: usize,
    pub task: Task,
}

impl AsRef<Task> for DisplayTask {
    fn as_ref(&self) -> &Task {
        &self.task
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskSelector {
    Index(usize),
    /// Inclusive, `start <= end`. Checked against the listing only on resolve.
    Range(usize, usize),
    Id(Uuid),
    Selected,
}

impl fmt::Display for TaskSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskSelector::Index(i) => write!(f, "{}", i),
            TaskSelector::Range(start, end) => write!(f, "{}-{}", start, end),
            TaskSelector::Id(id) => write!(f, "{}", id),
            TaskSelector::Selected => f.write_str(SELECTED_TOKEN),
        }
    }
}

/// Numbers `tasks` in canonical order.
pub fn index_tasks(tasks: &[Task], field: SortField, order: SortOrder) -> Vec<DisplayTask> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sort_tasks(&mut sorted, field, order);
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, task)| DisplayTask {
            index: i + 1,
            task: task.clone(),
        })
        .collect()
}

/// Parses one argument into a selector.
pub fn parse_selector(s: &str) -> std::result::Result<TaskSelector, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case(SELECTED_TOKEN) {
        return Ok(TaskSelector::Selected);
    }
    if let Ok(id) = Uuid::from_str(s) {
        return Ok(TaskSelector::Id(id));
    }

    if let Some((start, end)) = s.split_once('-') {
        let start = parse_index(start)?;
        let end = parse_index(end)?;
        if start > end {
            return Err(format!(
                "Invalid range: start ({}) must be <= end ({})",
                start, end
            ));
        }
        return Ok(if start == end {
            TaskSelector::Index(start)
        } else {
            TaskSelector::Range(start, end)
        });
    }

    parse_index(s).map(TaskSelector::Index)
}

fn parse_index(s: &str) -> std::result::Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("Invalid index format: {}", s)),
        Ok(n) => Ok(n),
    }
}

/// Parses every argument; duplicates are kept in first-seen order only once.
pub fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<TaskSelector>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for input in inputs {
        let sel = parse_selector(input.as_ref()).map_err(TodozError::Api)?;
        if seen.insert(sel) {
            out.push(sel);
        }
    }
    Ok(out)
}

/// Turns selectors into task ids.
///
/// `indexed` must be numbered 1..=len, as [`index_tasks`] returns it. A
/// range is bounds-checked before it is walked, so its size is at most the
/// listing's. UUIDs pass through unchecked. `selected` expands to `selection`.
pub fn resolve_selectors(
    indexed: &[DisplayTask],
    selection: &[Uuid],
    selectors: &[TaskSelector],
) -> Result<Vec<Uuid>> {
    let lookup = |i: usize| {
        i.checked_sub(1)
            .and_then(|pos| indexed.get(pos))
            .map(|dt| dt.task.id())
            .ok_or_else(|| TodozError::Api(format!("Index {} not found", i)))
    };

    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    let mut push = |id: Uuid| {
        if seen.insert(id) {
            ids.push(id);
        }
    };

    for sel in selectors {
        match *sel {
            TaskSelector::Index(i) => push(lookup(i)?),
            TaskSelector::Range(start, end) => {
                lookup(end)?;
                for i in start..=end {
                    push(lookup(i)?);
                }
            }
            TaskSelector::Id(id) => push(id),
            TaskSelector::Selected => selection.iter().copied().for_each(&mut push),
        }
    }
    Ok(ids)
}
