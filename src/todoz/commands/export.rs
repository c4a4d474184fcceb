use crate::commands::{plural, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Task;
use crate::persistence::Backup;
use crate::settings::Settings;

/// Serializes every task plus settings as a backup document.
pub fn run(tasks: &[Task], settings: &Settings) -> Result<CmdResult> {
    let json = Backup::new(tasks, settings).to_json()?;
    let mut result = CmdResult::default();
    result.exported = Some(json);
    result.add_message(CmdMessage::success(format!("Exported {}", plural(tasks.len()))));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskDraft;

    #[test]
    fn exports_document() {
        let tasks = vec![Task::from_draft(TaskDraft::new("A"))];
        let result = run(&tasks, &Settings::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(result.exported.as_ref().unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["todos"][0]["title"], "A");
        assert_eq!(result.messages[0].content, "Exported 1 task");
    }
}
