use uuid::Uuid;

use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::DisplayTask;

/// Picks the given tasks out of a numbered listing, in the order asked for.
pub fn run(indexed: &[DisplayTask], ids: &[Uuid]) -> Result<CmdResult> {
    let listed = ids
        .iter()
        .filter_map(|id| indexed.iter().find(|dt| dt.task.id() == *id).cloned())
        .collect();
    Ok(CmdResult::default().with_listed_tasks(listed))
}
