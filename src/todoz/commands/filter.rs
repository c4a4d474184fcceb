use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::filter::{DueFilter, FilterCriteria, FilterPatch};

pub fn set(criteria: &mut FilterCriteria, patch: FilterPatch) -> Result<CmdResult> {
    criteria.merge(patch);
    Ok(CmdResult::default().with_message(CmdMessage::info(describe(criteria))))
}

pub fn reset(criteria: &mut FilterCriteria) -> Result<CmdResult> {
    *criteria = FilterCriteria::default();
    Ok(CmdResult::default().with_message(CmdMessage::info(describe(criteria))))
}

pub fn describe(criteria: &FilterCriteria) -> String {
    if criteria.is_pass_through() {
        return "Filter: none".to_string();
    }
    let mut parts = vec![
        format!("status={}", criteria.status),
        format!("priority={}", criteria.priority),
        format!("category={}", String::from(criteria.category.clone())),
    ];
    if criteria.due != DueFilter::All {
        parts.push(format!("due={}", criteria.due));
    }
    if !criteria.search_query.is_empty() {
        parts.push(format!("search=\"{}\"", criteria.search_query));
    }
    format!("Filter: {}", parts.join(", "))
}
