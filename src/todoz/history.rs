//! # Undo/Redo History
//!
//! A bounded, linear log of task-list snapshots with a cursor marking the
//! current one.
//!
//! ```text
//!   entries:  [s0] [s1] [s2] [s3]
//!                        ^cursor
//!   undo -> s1      redo -> s3      record(x) -> [s0] [s1] [s2] [x]
//! ```
//!
//! ## Rules
//!
//! - `record` drops everything after the cursor, appends a clone of the list
//!   and moves the cursor to it. Past capacity the oldest entry is evicted,
//!   so the cursor still points at the entry just recorded.
//! - `undo` moves back one entry when the cursor is above the first entry.
//!   The first entry is the floor: there is nothing before it to restore.
//! - `redo` moves forward one entry when the cursor is below the last.
//! - `undo`/`redo` never record. Recording on undo would wipe out the redo
//!   branch.
//!
//! This is a plain line, not a tree: recording after an undo discards the
//! undone entries for good.
//!
//! The owner ([`crate::api::TodozApi`]) seeds the history with the list as it
//! was loaded, so that undoing every change of a session lands on that
//! starting list.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tracing::debug;

use crate::model::Task;

pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Snapshot>,
    cursor: Option<usize>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    /// A history holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            cursor: None,
            capacity,
        }
    }

    pub fn record(&mut self, tasks: &[Task]) {
        match self.cursor {
            Some(c) => self.entries.truncate(c + 1),
            None => self.entries.clear(),
        }

        self.entries.push_back(Snapshot {
            tasks: tasks.to_vec(),
            captured_at: Utc::now(),
        });

        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = Some(self.entries.len() - 1);

        debug!(
            entries = self.entries.len(),
            tasks = tasks.len(),
            "history: recorded snapshot"
        );
    }

    pub fn undo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor.filter(|c| *c > 0)?;
        self.cursor = Some(cursor - 1);
        debug!(cursor = cursor - 1, "history: undo");
        self.entries.get(cursor - 1)
    }

    pub fn redo(&mut self) -> Option<&Snapshot> {
        let next = self.cursor.map_or(0, |c| c + 1);
        if self.cursor.is_none() || next >= self.entries.len() {
            return None;
        }
        self.cursor = Some(next);
        debug!(cursor = next, "history: redo");
        self.entries.get(next)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    /// Index of the current entry, `None` while empty.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
