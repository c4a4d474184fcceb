//! # Domain Model
//!
//! The core types of todoz: [`Task`], [`Priority`], and the two shapes of
//! caller input, [`TaskDraft`] (a task that does not exist yet) and
//! [`TaskPatch`] (a partial change to an existing task).
//!
//! ## Identity and Creation Time
//!
//! A task's `id` and `created_at` are assigned exactly once, in
//! [`Task::from_draft`], and have no setters. Drafts and patches cannot
//! carry either field, so there is no code path that rewrites them.
//!
//! ## Wire Shape
//!
//! Tasks serialize with the field names the stored payloads have always used
//! (`isCompleted`, `dueDate`, `createdAt`), and instants are integer
//! milliseconds since the Unix epoch:
//!
//! ```text
//! {
//!   "id": "5b0c…",
//!   "title": "Write report",
//!   "description": "Q3 numbers",
//!   "isCompleted": false,
//!   "priority": "high",
//!   "category": "work",
//!   "dueDate": 1767225599000,
//!   "createdAt": 1767139200000
//! }
//! ```
//!
//! ## Categories
//!
//! A blank category is replaced by [`DEFAULT_CATEGORY`] both at creation and
//! when a patch sets one, so every stored task has a non-empty category.

use chrono::serde::{ts_milliseconds, ts_milliseconds_option};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Result, TodozError, ValidationError};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_CATEGORY_LEN: usize = 50;

/// Category assigned to tasks created or updated with a blank category.
pub const DEFAULT_CATEGORY: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Ordering weight used when sorting by priority: high outranks low.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "l" => Ok(Priority::Low),
            "medium" | "med" | "m" => Ok(Priority::Medium),
            "high" | "h" => Ok(Priority::High),
            _ => Err(ValidationError::InvalidPriority(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_completed: bool,
    pub priority: Priority,
    pub category: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "ts_milliseconds_option"
    )]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(with = "ts_milliseconds")]
    created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a task from a draft, assigning a fresh id and the current instant.
    ///
    /// The instant is cut to whole milliseconds, the precision it is stored
    /// with, so a saved task reloads equal to itself.
    ///
    /// Does not validate; callers run [`crate::validate::validate_draft`] first.
    pub fn from_draft(draft: TaskDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            is_completed: draft.is_completed,
            priority: draft.priority,
            category: normalize_category(draft.category),
            due_date: draft.due_date,
            created_at: Utc::now().trunc_subsecs(3),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed && self.due_date.is_some_and(|due| due < now)
    }
}

/// A task as the caller describes it, before it gets an id and creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
    pub is_completed: bool,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }
}

/// Partial update of a task. `None` leaves a field untouched.
///
/// `description` and `due_date` are doubly optional: `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub is_completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
            && self.is_completed.is_none()
    }

    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = &self.category {
            task.category = normalize_category(category.clone());
        }
        if let Some(due) = self.due_date {
            task.due_date = due;
        }
        if let Some(done) = self.is_completed {
            task.is_completed = done;
        }
    }
}

fn normalize_category(category: String) -> String {
    if category.trim().is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        category
    }
}

/// Parses a due date typed by a user.
///
/// Accepts `YYYY-MM-DD` (end of that day, local time), `YYYY-MM-DD HH:MM`
/// (local time) and RFC 3339. Sub-millisecond digits are dropped.
pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc).trunc_subsecs(3));
    }

    let naive = if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        Some(naive)
    } else if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        date.and_hms_opt(23, 59, 59)
    } else {
        None
    };

    naive
        .and_then(|n| Local.from_local_datetime(&n).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| TodozError::Api(format!("Invalid due date: {}", input)))
}
