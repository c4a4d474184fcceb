use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::history::History;
use crate::repository::TaskRepository;

/// Steps back one snapshot. Never records.
pub fn undo(repo: &mut TaskRepository, history: &mut History) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match history.undo() {
        Some(snapshot) => {
            repo.replace_all(snapshot.tasks.clone());
            result.add_message(CmdMessage::success("Undone"));
        }
        None => result.add_message(CmdMessage::info("Nothing to undo")),
    }
    Ok(result)
}

/// Steps forward one snapshot. Never records.
pub fn redo(repo: &mut TaskRepository, history: &mut History) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match history.redo() {
        Some(snapshot) => {
            repo.replace_all(snapshot.tasks.clone());
            result.add_message(CmdMessage::success("Redone"));
        }
        None => result.add_message(CmdMessage::info("Nothing to redo")),
    }
    Ok(result)
}
