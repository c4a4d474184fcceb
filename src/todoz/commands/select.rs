use uuid::Uuid;

use crate::commands::{plural, CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::DisplayTask;
use crate::repository::TaskRepository;

pub fn select(repo: &mut TaskRepository, ids: &[Uuid]) -> Result<CmdResult> {
    let added = ids.iter().filter(|id| repo.select(**id)).count();
    Ok(summary(repo, format!("Selected {}", plural(added))))
}

pub fn unselect(repo: &mut TaskRepository, ids: &[Uuid]) -> Result<CmdResult> {
    let removed = ids.iter().filter(|id| repo.unselect(**id)).count();
    Ok(summary(repo, format!("Unselected {}", plural(removed))))
}

pub fn toggle(repo: &mut TaskRepository, ids: &[Uuid]) -> Result<CmdResult> {
    for id in ids {
        repo.toggle_select(*id);
    }
    Ok(summary(repo, "Selection updated".to_string()))
}

/// Replaces the selection with `visible`, the ids of the tasks currently shown.
pub fn select_all(repo: &mut TaskRepository, visible: &[Uuid]) -> Result<CmdResult> {
    repo.select_all(visible);
    Ok(summary(repo, format!("Selected {}", plural(repo.selected_ids().len()))))
}

pub fn unselect_all(repo: &mut TaskRepository) -> Result<CmdResult> {
    repo.unselect_all();
    Ok(CmdResult::default().with_message(CmdMessage::success("Selection cleared")))
}

/// The selected tasks, numbered as in `indexed`.
pub fn list(repo: &TaskRepository, indexed: &[DisplayTask]) -> Result<CmdResult> {
    let listed: Vec<DisplayTask> = indexed
        .iter()
        .filter(|dt| repo.is_selected(dt.task.id()))
        .cloned()
        .collect();
    let mut result = CmdResult::default();
    if listed.is_empty() {
        result.add_message(CmdMessage::info("Nothing selected"));
    }
    Ok(result.with_listed_tasks(listed))
}

fn summary(repo: &TaskRepository, headline: String) -> CmdResult {
    CmdResult::default()
        .with_message(CmdMessage::success(headline))
        .with_message(CmdMessage::info(format!(
            "{} selected",
            plural(repo.selected_ids().len())
        )))
}
