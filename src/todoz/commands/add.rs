use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::TaskDraft;
use crate::repository::TaskRepository;
use crate::validate::validate_draft;

pub fn run(repo: &mut TaskRepository, draft: TaskDraft) -> Result<CmdResult> {
    validate_draft(&draft)?;

    let task = repo.create(draft).clone();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Task added: {}", task.title)));
    result.affected_tasks.push(task);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{TodozError, ValidationError};

    #[test]
    fn adds_newest_first() {
        let mut repo = TaskRepository::new();
        run(&mut repo, TaskDraft::new("A")).unwrap();
        let result = run(&mut repo, TaskDraft::new("B")).unwrap();

        assert_eq!(result.affected_tasks[0].title, "B");
        assert_eq!(repo.tasks()[0].title, "B");
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn invalid_draft_leaves_repo_untouched() {
        let mut repo = TaskRepository::new();
        let err = run(&mut repo, TaskDraft::new("   ")).unwrap_err();
        match err {
            TodozError::Validation(errors) => {
                assert!(errors.contains(&ValidationError::EmptyTitle))
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(repo.is_empty());
    }
}
