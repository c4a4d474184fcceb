use crate::commands::{import, plural, CmdMessage, CmdResult};
use crate::error::Result;
use crate::persistence::{clear_all_data, create_backup, load_backup, storage_info};
use crate::repository::TaskRepository;
use crate::settings::Settings;
use crate::store::KeyValueStore;

/// Stores a backup document under the backup key, replacing any previous one.
pub fn backup<S: KeyValueStore>(store: &S, repo: &TaskRepository, settings: &Settings) -> Result<CmdResult> {
    create_backup(store, repo.tasks(), settings)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Backed up {}",
        plural(repo.len())
    ))))
}

/// Imports the stored backup. Fails when there is none.
pub fn restore<S: KeyValueStore>(
    store: &S,
    repo: &mut TaskRepository,
    settings: &mut Settings,
) -> Result<CmdResult> {
    let data = load_backup(store)?;
    Ok(import::apply(repo, settings, data))
}

/// Wipes tasks, settings and backup, in storage and in memory.
pub fn reset<S: KeyValueStore>(
    store: &S,
    repo: &mut TaskRepository,
    settings: &mut Settings,
) -> Result<CmdResult> {
    clear_all_data(store)?;
    repo.replace_all(Vec::new());
    repo.unselect_all();
    *settings = Settings::default();
    Ok(CmdResult::default().with_message(CmdMessage::success("All data cleared")))
}

pub fn info<S: KeyValueStore>(store: &S) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    result.storage = Some(storage_info(store)?);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TodozError;
    use crate::model::TaskDraft;
    use crate::persistence::{save_state, BACKUP_KEY};
    use crate::store::memory::InMemoryStore;

    #[test]
    fn backup_then_restore() {
        let store = InMemoryStore::new();
        let mut repo = TaskRepository::new();
        let mut settings = Settings::default();
        repo.create(TaskDraft::new("A"));

        backup(&store, &repo, &settings).unwrap();
        assert!(store.get_string(BACKUP_KEY).is_some());

        repo.create(TaskDraft::new("B"));
        restore(&store, &mut repo, &mut settings).unwrap();
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.tasks()[0].title, "A");
    }

    #[test]
    fn restore_without_backup_fails() {
        let store = InMemoryStore::new();
        let mut repo = TaskRepository::new();
        let mut settings = Settings::default();
        let err = restore(&store, &mut repo, &mut settings).unwrap_err();
        assert!(matches!(err, TodozError::Import(_)));
    }

    #[test]
    fn reset_wipes_everything() {
        let store = InMemoryStore::new();
        let mut repo = TaskRepository::new();
        let id = repo.create(TaskDraft::new("A")).id();
        repo.select(id);
        let mut settings = Settings {
            default_category: "home".into(),
            ..Settings::default()
        };
        save_state(&store, repo.tasks(), None).unwrap();
        settings.save(&store).unwrap();

        reset(&store, &mut repo, &mut settings).unwrap();
        assert!(repo.is_empty());
        assert!(repo.selected_ids().is_empty());
        assert_eq!(settings, Settings::default());
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn reports_usage() {
        let store = InMemoryStore::new();
        store.save("todo-storage", b"{}").unwrap();
        let result = info(&store).unwrap();
        assert_eq!(result.storage.unwrap().used, 14);
    }
}
