use uuid::Uuid;

use crate::commands::{plural, tasks_by_ids, CmdMessage, CmdResult};
use crate::error::Result;
use crate::repository::TaskRepository;

/// Copies each task to the front of the list; the copies start out active.
pub fn run(repo: &mut TaskRepository, ids: &[Uuid]) -> Result<CmdResult> {
    let copies = repo.batch_duplicate(ids);

    let mut result = CmdResult::default().with_affected_tasks(tasks_by_ids(repo, &copies));
    if copies.is_empty() {
        result.add_message(CmdMessage::warning("No matching tasks"));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Duplicated {}",
            plural(copies.len())
        )));
    }
    Ok(result)
}
