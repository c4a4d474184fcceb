use uuid::Uuid;

use crate::commands::{plural, tasks_by_ids, CmdMessage, CmdResult};
use crate::error::Result;
use crate::repository::TaskRepository;

/// Flips each task's completion flag.
pub fn run(repo: &mut TaskRepository, ids: &[Uuid]) -> Result<CmdResult> {
    let count = repo.batch_toggle(ids);
    Ok(report(repo, ids, count, "Toggled"))
}

/// Marks each task completed (`true`) or active (`false`).
pub fn set_completed(repo: &mut TaskRepository, ids: &[Uuid], completed: bool) -> Result<CmdResult> {
    let count = repo.batch_set_completed(ids, completed);
    let verb = if completed { "Completed" } else { "Reopened" };
    Ok(report(repo, ids, count, verb))
}

fn report(repo: &TaskRepository, ids: &[Uuid], count: usize, verb: &str) -> CmdResult {
    let mut result = CmdResult::default().with_affected_tasks(tasks_by_ids(repo, ids));
    if count == 0 {
        result.add_message(CmdMessage::warning("No matching tasks"));
    } else {
        result.add_message(CmdMessage::success(format!("{} {}", verb, plural(count))));
    }
    result
}
