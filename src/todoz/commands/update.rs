use uuid::Uuid;

use crate::commands::{plural, tasks_by_ids, CmdMessage, CmdResult};
use crate::error::{Result, TodozError};
use crate::model::TaskPatch;
use crate::repository::TaskRepository;
use crate::validate::validate_patch;

pub fn run(repo: &mut TaskRepository, ids: &[Uuid], patch: &TaskPatch) -> Result<CmdResult> {
    if patch.is_empty() {
        return Err(TodozError::Api("Nothing to update".to_string()));
    }
    validate_patch(patch)?;

    let touched = repo.batch_update(ids, patch);
    let mut result = CmdResult::default().with_affected_tasks(tasks_by_ids(repo, ids));
    if touched == 0 {
        result.add_message(CmdMessage::warning("No matching tasks"));
    } else {
        result.add_message(CmdMessage::success(format!("Updated {}", plural(touched))));
    }
    Ok(result)
}
