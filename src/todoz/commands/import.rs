use crate::commands::{plural, CmdMessage, CmdResult};
use crate::error::Result;
use crate::persistence::{parse_backup, ImportedData};
use crate::repository::TaskRepository;
use crate::settings::Settings;

/// Replaces the task list (and merges settings) from a backup document.
///
/// The document is fully checked before anything changes.
pub fn run(repo: &mut TaskRepository, settings: &mut Settings, json: &str) -> Result<CmdResult> {
    let data = parse_backup(json)?;
    Ok(apply(repo, settings, data))
}

pub(crate) fn apply(repo: &mut TaskRepository, settings: &mut Settings, data: ImportedData) -> CmdResult {
    repo.replace_all(data.tasks);
    let count = repo.len();

    let mut result = CmdResult::default();
    if let Some(patch) = data.settings {
        settings.merge(patch);
        result.settings = Some(settings.clone());
    }
    result.add_message(CmdMessage::success(format!("Imported {}", plural(count))));
    result.with_affected_tasks(repo.tasks().to_vec())
}
