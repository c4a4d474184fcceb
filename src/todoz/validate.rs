//! Input validation.
//!
//! Runs before any mutation reaches the repository. Every problem in an input
//! is collected so the caller can report them all at once; nothing is ever
//! truncated to fit.

use chrono::{DateTime, Utc};

use crate::error::{ValidationError, ValidationErrors};
use crate::model::{
    Task, TaskDraft, TaskPatch, MAX_CATEGORY_LEN, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN,
};

pub fn validate_draft(draft: &TaskDraft) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    check_title(&draft.title, &mut errors);
    check_description(draft.description.as_deref(), &mut errors);
    check_category(&draft.category, &mut errors);
    check_due(draft.due_date, &mut errors);
    finish(errors)
}

pub fn validate_patch(patch: &TaskPatch) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    if let Some(title) = &patch.title {
        check_title(title, &mut errors);
    }
    if let Some(description) = &patch.description {
        check_description(description.as_deref(), &mut errors);
    }
    if let Some(category) = &patch.category {
        check_category(category, &mut errors);
    }
    if let Some(due) = patch.due_date {
        check_due(due, &mut errors);
    }
    finish(errors)
}

/// Validates a task that arrived fully formed, e.g. from an imported backup.
pub fn validate_task(task: &Task) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    check_title(&task.title, &mut errors);
    check_description(task.description.as_deref(), &mut errors);
    check_category(&task.category, &mut errors);
    check_due(task.due_date, &mut errors);
    finish(errors)
}

fn check_title(title: &str, errors: &mut Vec<ValidationError>) {
    if title.trim().is_empty() {
        errors.push(ValidationError::EmptyTitle);
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        errors.push(ValidationError::TitleTooLong {
            len,
            max: MAX_TITLE_LEN,
        });
    }
}

fn check_description(description: Option<&str>, errors: &mut Vec<ValidationError>) {
    let len = description.map(|d| d.chars().count()).unwrap_or(0);
    if len > MAX_DESCRIPTION_LEN {
        errors.push(ValidationError::DescriptionTooLong {
            len,
            max: MAX_DESCRIPTION_LEN,
        });
    }
}

fn check_category(category: &str, errors: &mut Vec<ValidationError>) {
    let len = category.chars().count();
    if len > MAX_CATEGORY_LEN {
        errors.push(ValidationError::CategoryTooLong {
            len,
            max: MAX_CATEGORY_LEN,
        });
    }
}

fn check_due(due: Option<DateTime<Utc>>, errors: &mut Vec<ValidationError>) {
    if let Some(due) = due {
        let ms = due.timestamp_millis();
        if ms < 0 {
            errors.push(ValidationError::NegativeDueDate(ms));
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accepts_a_plain_draft() {
        assert!(validate_draft(&TaskDraft::new("Water plants")).is_ok());
    }

    #[test]
    fn rejects_blank_title() {
        let err = validate_draft(&TaskDraft::new("   ")).unwrap_err();
        assert!(err.contains(&ValidationError::EmptyTitle));
    }

    #[test]
    fn title_bound_counts_characters_not_bytes() {
        let at_limit = "é".repeat(MAX_TITLE_LEN);
        assert!(validate_draft(&TaskDraft::new(at_limit)).is_ok());

        let over = "a".repeat(MAX_TITLE_LEN + 1);
        let err = validate_draft(&TaskDraft::new(over)).unwrap_err();
        assert!(err.contains(&ValidationError::TitleTooLong {
            len: MAX_TITLE_LEN + 1,
            max: MAX_TITLE_LEN
        }));
    }

    #[test]
    fn collects_every_problem() {
        let draft = TaskDraft::new("")
            .with_description("d".repeat(MAX_DESCRIPTION_LEN + 1))
            .with_category("c".repeat(MAX_CATEGORY_LEN + 1))
            .with_due_date(Utc.timestamp_millis_opt(-1).unwrap());
        let err = validate_draft(&draft).unwrap_err();
        assert_eq!(err.0.len(), 4);
        assert!(err.contains(&ValidationError::NegativeDueDate(-1)));
    }

    #[test]
    fn patch_checks_only_present_fields() {
        assert!(validate_patch(&TaskPatch::default()).is_ok());

        let patch = TaskPatch {
            title: Some(String::new()),
            ..TaskPatch::default()
        };
        assert!(validate_patch(&patch).is_err());

        let clear_description = TaskPatch {
            description: Some(None),
            ..TaskPatch::default()
        };
        assert!(validate_patch(&clear_description).is_ok());
    }
}
