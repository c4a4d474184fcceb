//! # Filter Evaluator
//!
//! A pure, stable filter over a task list. Criteria combine conjunctively:
//! a task is kept only if it passes the status, priority, category, due and
//! search checks. The "all" / empty value of each criterion passes
//! everything through.
//!
//! Search is a case-insensitive substring match against the title, the
//! description or the category.
//!
//! The due criterion depends on the current instant, so matching takes "now"
//! as a parameter. It is a per-listing narrowing and is never serialized.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::{Priority, Task};
use crate::stats::{due_state, DueState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" | "open" => Ok(StatusFilter::Active),
            "completed" | "done" => Ok(StatusFilter::Completed),
            other => Err(format!("Invalid status filter: {}", other)),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Active => f.write_str("active"),
            StatusFilter::Completed => f.write_str("completed"),
        }
    }
}

/// Either every priority or exactly one. Serialized as `"all"` or the priority name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl TryFrom<String> for PriorityFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PriorityFilter> for String {
    fn from(value: PriorityFilter) -> Self {
        value.to_string()
    }
}

impl FromStr for PriorityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(PriorityFilter::All);
        }
        s.parse::<Priority>()
            .map(PriorityFilter::Only)
            .map_err(|e| e.to_string())
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityFilter::All => f.write_str("all"),
            PriorityFilter::Only(p) => write!(f, "{}", p),
        }
    }
}

/// Either every category or one exact category name. `"all"` is reserved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == "all" || value.is_empty() {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value)
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        match value {
            CategoryFilter::All => "all".to_string(),
            CategoryFilter::Only(c) => c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DueFilter {
    #[default]
    All,
    Overdue,
    DueToday,
}

impl FromStr for DueFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DueFilter::All),
            "overdue" => Ok(DueFilter::Overdue),
            "today" | "due-today" => Ok(DueFilter::DueToday),
            other => Err(format!("Invalid due filter: {}", other)),
        }
    }
}

impl fmt::Display for DueFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueFilter::All => f.write_str("all"),
            DueFilter::Overdue => f.write_str("overdue"),
            DueFilter::DueToday => f.write_str("due-today"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub category: CategoryFilter,
    pub search_query: String,
    #[serde(skip)]
    pub due: DueFilter,
}

impl FilterCriteria {
    pub fn is_pass_through(&self) -> bool {
        *self == FilterCriteria::default()
    }

    /// Overlays the fields present in `patch`.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(query) = patch.search_query {
            self.search_query = query;
        }
        if let Some(due) = patch.due {
            self.due = due;
        }
    }

    pub fn matches<Tz: TimeZone>(&self, task: &Task, now: &DateTime<Tz>) -> bool {
        match self.status {
            StatusFilter::Active if task.is_completed => return false,
            StatusFilter::Completed if !task.is_completed => return false,
            _ => {}
        }

        if let PriorityFilter::Only(p) = self.priority {
            if task.priority != p {
                return false;
            }
        }

        if let CategoryFilter::Only(c) = &self.category {
            if &task.category != c {
                return false;
            }
        }

        let wanted = match self.due {
            DueFilter::All => None,
            DueFilter::Overdue => Some(DueState::Overdue),
            DueFilter::DueToday => Some(DueState::DueToday),
        };
        if wanted.is_some() && due_state(task, now) != wanted {
            return false;
        }

        if !self.search_query.is_empty() {
            let query = self.search_query.to_lowercase();
            let in_title = task.title.to_lowercase().contains(&query);
            let in_description = task
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&query));
            let in_category = task.category.to_lowercase().contains(&query);
            return in_title || in_description || in_category;
        }

        true
    }
}

/// Partial change to the active criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub status: Option<StatusFilter>,
    pub priority: Option<PriorityFilter>,
    pub category: Option<CategoryFilter>,
    pub search_query: Option<String>,
    pub due: Option<DueFilter>,
}

/// Returns the tasks satisfying `criteria` at `now`, in source order.
pub fn filter_tasks<'a, Tz: TimeZone>(
    tasks: &'a [Task],
    criteria: &FilterCriteria,
    now: &DateTime<Tz>,
) -> Vec<&'a Task> {
    tasks.iter().filter(|t| criteria.matches(t, now)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskDraft;
    use chrono::{Duration, Utc};

    fn task(title: &str, priority: Priority, category: &str, done: bool) -> Task {
        let mut t = Task::from_draft(
            TaskDraft::new(title)
                .with_priority(priority)
                .with_category(category),
        );
        t.is_completed = done;
        t
    }

    fn sample() -> Vec<Task> {
        vec![
            task("Call plumber", Priority::High, "home", false),
            task("Quarterly report", Priority::Medium, "work", true),
            task("Buy stamps", Priority::Low, "home", true),
        ]
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn default_criteria_pass_everything_in_order() {
        let tasks = sample();
        let out = filter_tasks(&tasks, &FilterCriteria::default(), &Utc::now());
        assert_eq!(
            titles(&out),
            vec!["Call plumber", "Quarterly report", "Buy stamps"]
        );
    }

    #[test]
    fn status_filter() {
        let tasks = sample();
        let completed = FilterCriteria {
            status: StatusFilter::Completed,
            ..FilterCriteria::default()
        };
        assert_eq!(
            titles(&filter_tasks(&tasks, &completed, &Utc::now())),
            vec!["Quarterly report", "Buy stamps"]
        );

        let active = FilterCriteria {
            status: StatusFilter::Active,
            ..FilterCriteria::default()
        };
        assert_eq!(titles(&filter_tasks(&tasks, &active, &Utc::now())), vec!["Call plumber"]);
    }

    #[test]
    fn criteria_combine_with_and() {
        let tasks = sample();
        let criteria = FilterCriteria {
            status: StatusFilter::Completed,
            category: CategoryFilter::Only("home".into()),
            ..FilterCriteria::default()
        };
        assert_eq!(titles(&filter_tasks(&tasks, &criteria, &Utc::now())), vec!["Buy stamps"]);

        let none = FilterCriteria {
            priority: PriorityFilter::Only(Priority::High),
            category: CategoryFilter::Only("work".into()),
            ..FilterCriteria::default()
        };
        assert!(filter_tasks(&tasks, &none, &Utc::now()).is_empty());
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let mut tasks = sample();
        tasks[2].description = Some("for the REPORT envelopes".into());

        let criteria = FilterCriteria {
            search_query: "report".into(),
            ..FilterCriteria::default()
        };
        assert_eq!(
            titles(&filter_tasks(&tasks, &criteria, &Utc::now())),
            vec!["Quarterly report", "Buy stamps"]
        );
    }

    #[test]
    fn search_without_description_checks_title_and_category() {
        let tasks = vec![task("Groceries", Priority::Low, "home", false)];
        let criteria = FilterCriteria {
            search_query: "milk".into(),
            ..FilterCriteria::default()
        };
        assert!(filter_tasks(&tasks, &criteria, &Utc::now()).is_empty());
    }

    #[test]
    fn search_matches_category() {
        let tasks = sample();
        let criteria = FilterCriteria {
            search_query: "WOR".into(),
            ..FilterCriteria::default()
        };
        assert_eq!(
            titles(&filter_tasks(&tasks, &criteria, &Utc::now())),
            vec!["Quarterly report"]
        );
    }

    #[test]
    fn due_filter_splits_overdue_from_due_today() {
        let now = Utc::now()
            .date_naive()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc();
        let mut tasks = sample();
        tasks[0].due_date = Some(now - Duration::days(1));
        tasks[1].due_date = Some(now - Duration::days(1));
        tasks[2].is_completed = false;
        tasks[2].due_date = Some(now + Duration::hours(2));

        let overdue = FilterCriteria {
            due: DueFilter::Overdue,
            ..FilterCriteria::default()
        };
        assert_eq!(titles(&filter_tasks(&tasks, &overdue, &now)), vec!["Call plumber"]);

        let today = FilterCriteria {
            due: DueFilter::DueToday,
            ..FilterCriteria::default()
        };
        assert_eq!(titles(&filter_tasks(&tasks, &today, &now)), vec!["Buy stamps"]);
    }

    #[test]
    fn due_filter_parses_and_is_not_serialized() {
        assert_eq!("overdue".parse::<DueFilter>(), Ok(DueFilter::Overdue));
        assert_eq!("Today".parse::<DueFilter>(), Ok(DueFilter::DueToday));
        assert!("soon".parse::<DueFilter>().is_err());

        let criteria = FilterCriteria {
            due: DueFilter::Overdue,
            ..FilterCriteria::default()
        };
        let value = serde_json::to_value(&criteria).unwrap();
        assert!(value.get("due").is_none());
    }

    #[test]
    fn merge_overlays_present_fields() {
        let mut criteria = FilterCriteria {
            search_query: "x".into(),
            ..FilterCriteria::default()
        };
        criteria.merge(FilterPatch {
            status: Some(StatusFilter::Active),
            ..FilterPatch::default()
        });
        assert_eq!(criteria.status, StatusFilter::Active);
        assert_eq!(criteria.search_query, "x");
        assert!(!criteria.is_pass_through());
    }

    #[test]
    fn serializes_with_all_sentinels() {
        let value = serde_json::to_value(FilterCriteria::default()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "status": "all",
                "priority": "all",
                "category": "all",
                "searchQuery": ""
            })
        );

        let parsed: FilterCriteria =
            serde_json::from_str(r#"{"status":"active","priority":"high","category":"work"}"#)
                .unwrap();
        assert_eq!(parsed.priority, PriorityFilter::Only(Priority::High));
        assert_eq!(parsed.category, CategoryFilter::Only("work".into()));
        assert_eq!(parsed.search_query, "");
    }
}
