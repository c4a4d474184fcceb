use chrono::{DateTime, TimeZone};

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::filter::FilterCriteria;
use crate::index::index_tasks;
use crate::repository::TaskRepository;
use crate::sort::{sort_tasks, SortField, SortOrder};

/// How listings are numbered and how they are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListOrder {
    pub index_by: (SortField, SortOrder),
    pub display_by: (SortField, SortOrder),
}

impl ListOrder {
    pub fn same(field: SortField, order: SortOrder) -> Self {
        Self {
            index_by: (field, order),
            display_by: (field, order),
        }
    }
}

/// Tasks passing `criteria` at `now`, numbered by `order.index_by` and shown
/// in `order.display_by`.
pub fn run<Tz: TimeZone>(
    repo: &TaskRepository,
    criteria: &FilterCriteria,
    order: ListOrder,
    now: &DateTime<Tz>,
) -> Result<CmdResult> {
    let (field, dir) = order.index_by;
    let mut listed: Vec<_> = index_tasks(repo.tasks(), field, dir)
        .into_iter()
        .filter(|dt| criteria.matches(&dt.task, now))
        .collect();

    let (field, dir) = order.display_by;
    sort_tasks(&mut listed, field, dir);

    let mut result = CmdResult::default();
    if repo.is_empty() {
        result.add_message(CmdMessage::info("No tasks yet"));
    } else if listed.is_empty() {
        result.add_message(CmdMessage::info("No tasks match the current filter"));
    }
    Ok(result.with_listed_tasks(listed))
}

pub fn categories(repo: &TaskRepository) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    result.categories = repo.categories();
    if result.categories.is_empty() {
        result.add_message(CmdMessage::info("No categories yet"));
    }
    Ok(result)
}
