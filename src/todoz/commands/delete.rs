use uuid::Uuid;

use crate::commands::{plural, tasks_by_ids, CmdMessage, CmdResult};
use crate::error::Result;
use crate::repository::TaskRepository;

pub fn run(repo: &mut TaskRepository, ids: &[Uuid]) -> Result<CmdResult> {
    let removed = tasks_by_ids(repo, ids);
    let count = repo.batch_delete(ids);

    let mut result = CmdResult::default().with_affected_tasks(removed);
    if count == 0 {
        result.add_message(CmdMessage::warning("No matching tasks"));
    } else {
        result.add_message(CmdMessage::success(format!("Deleted {}", plural(count))));
    }
    Ok(result)
}

/// Removes every completed task.
pub fn completed(repo: &mut TaskRepository) -> Result<CmdResult> {
    let removed: Vec<_> = repo
        .tasks()
        .iter()
        .filter(|t| t.is_completed)
        .cloned()
        .collect();
    let count = repo.delete_completed();

    let mut result = CmdResult::default().with_affected_tasks(removed);
    if count == 0 {
        result.add_message(CmdMessage::info("No completed tasks"));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Cleared {}",
            plural(count)
        )));
    }
    Ok(result)
}
