//! Display ordering for task listings.
//!
//! The repository keeps tasks newest first. Any other order is a presentation
//! choice made by the client, using the field and direction from settings or
//! the command line.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::model::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    DueDate,
    Priority,
    Title,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "createdat" | "created" => Ok(SortField::CreatedAt),
            "duedate" | "due" => Ok(SortField::DueDate),
            "priority" => Ok(SortField::Priority),
            "title" => Ok(SortField::Title),
            other => Err(format!("Invalid sort field: {}", other)),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortField::CreatedAt => "createdAt",
            SortField::DueDate => "dueDate",
            SortField::Priority => "priority",
            SortField::Title => "title",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Invalid sort order: {}", other)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

fn compare(a: &Task, b: &Task, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at().cmp(&b.created_at()),
        // Undated tasks go after dated ones; the direction flip applies to this too.
        SortField::DueDate => match (a.due_date, b.due_date) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => x.cmp(&y),
        },
        SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortField::Title => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.title.cmp(&b.title)),
    }
}

/// Stable sort of `tasks` in place.
pub fn sort_tasks<T: AsRef<Task>>(tasks: &mut [T], field: SortField, order: SortOrder) {
    tasks.sort_by(|a, b| {
        let ord = compare(a.as_ref(), b.as_ref(), field);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

impl AsRef<Task> for Task {
    fn as_ref(&self) -> &Task {
        self
    }
}
