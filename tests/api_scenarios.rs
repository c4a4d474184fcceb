use std::path::Path;

use tempfile::tempdir;
use todoz::api::{CmdResult, MessageLevel, TodozApi};
use todoz::error::TodozError;
use todoz::filter::{FilterPatch, StatusFilter};
use todoz::model::{Priority, TaskDraft};
use todoz::stats::TaskStats;
use todoz::store::fs::FileStore;

fn open(dir: &Path) -> TodozApi<FileStore> {
    TodozApi::new(FileStore::new(dir))
}

fn titles(result: &CmdResult) -> Vec<String> {
    result
        .listed_tasks
        .iter()
        .map(|dt| dt.task.title.clone())
        .collect()
}

fn seed(api: &mut TodozApi<FileStore>) {
    api.add_task(TaskDraft::new("A").with_priority(Priority::High))
        .unwrap();
    api.add_task(TaskDraft::new("B").with_priority(Priority::Low))
        .unwrap();
    api.add_task(TaskDraft::new("C")).unwrap();
}

fn stats(api: &TodozApi<FileStore>) -> TaskStats {
    api.stats(false).unwrap().stats.unwrap()
}

#[test]
fn newest_first_with_counts() {
    let dir = tempdir().unwrap();
    let mut api = open(dir.path());
    seed(&mut api);

    let listed = api.list_tasks(FilterPatch::default(), None).unwrap();
    assert_eq!(titles(&listed), vec!["C", "B", "A"]);
    assert_eq!(
        stats(&api),
        TaskStats {
            total: 3,
            completed: 0,
            active: 3,
            completion_rate: 0
        }
    );
}

#[test]
fn toggling_updates_stats_and_filters() {
    let dir = tempdir().unwrap();
    let mut api = open(dir.path());
    seed(&mut api);

    api.toggle_tasks(&["3"]).unwrap();
    assert_eq!(
        stats(&api),
        TaskStats {
            total: 3,
            completed: 1,
            active: 2,
            completion_rate: 33
        }
    );

    let done = api
        .list_tasks(
            FilterPatch {
                status: Some(StatusFilter::Completed),
                ..FilterPatch::default()
            },
            None,
        )
        .unwrap();
    assert_eq!(titles(&done), vec!["A"]);
    assert_eq!(done.listed_tasks[0].index, 3);
}

#[test]
fn state_survives_a_new_session() {
    let dir = tempdir().unwrap();
    {
        let mut api = open(dir.path());
        seed(&mut api);
        api.set_completed(&["1"], true).unwrap();
    }

    let api = open(dir.path());
    let listed = api.list_tasks(FilterPatch::default(), None).unwrap();
    assert_eq!(titles(&listed), vec!["C", "B", "A"]);
    assert!(listed.listed_tasks[0].task.is_completed);
    assert!(!api.can_undo());
}

#[test]
fn malformed_import_leaves_data_alone() {
    let dir = tempdir().unwrap();
    let mut api = open(dir.path());
    seed(&mut api);

    let err = api.import_json(r#"{"foo":1}"#).unwrap_err();
    assert!(matches!(err, TodozError::Import(_)));
    assert_eq!(api.tasks().len(), 3);

    let reopened = open(dir.path());
    assert_eq!(reopened.tasks().len(), 3);
}

#[test]
fn export_then_import_into_fresh_home() {
    let source = tempdir().unwrap();
    let target = tempdir().unwrap();

    let mut api = open(source.path());
    seed(&mut api);
    let json = api.export().unwrap().exported.unwrap();

    let mut other = open(target.path());
    other.import_json(&json).unwrap();
    let ids: Vec<_> = other.tasks().iter().map(|t| t.id()).collect();
    let expected: Vec<_> = api.tasks().iter().map(|t| t.id()).collect();
    assert_eq!(ids, expected);

    assert_eq!(open(target.path()).tasks().len(), 3);
}

#[test]
fn backup_and_restore() {
    let dir = tempdir().unwrap();
    let mut api = open(dir.path());
    seed(&mut api);

    api.create_backup().unwrap();
    api.delete_tasks(&["1", "2"]).unwrap();
    assert_eq!(api.tasks().len(), 1);

    api.restore_backup().unwrap();
    assert_eq!(api.tasks().len(), 3);
    assert_eq!(open(dir.path()).tasks().len(), 3);
}

#[test]
fn unwritable_home_keeps_changes_in_memory() {
    let dir = tempdir().unwrap();
    let not_a_dir = dir.path().join("file");
    std::fs::write(&not_a_dir, b"occupied").unwrap();

    let mut api = open(&not_a_dir);
    assert!(api.tasks().is_empty());

    let result = api.add_task(TaskDraft::new("Still here")).unwrap();
    assert_eq!(api.tasks().len(), 1);
    assert!(result
        .messages
        .iter()
        .any(|m| m.level == MessageLevel::Warning && m.content.starts_with("Changes not saved")));
}

#[test]
fn undo_walks_back_to_the_loaded_list() {
    let dir = tempdir().unwrap();
    {
        let mut api = open(dir.path());
        api.add_task(TaskDraft::new("Existing")).unwrap();
    }

    let mut api = open(dir.path());
    api.add_task(TaskDraft::new("New")).unwrap();
    api.clear_completed().unwrap();

    api.undo().unwrap();
    api.undo().unwrap();
    assert_eq!(api.tasks().len(), 1);
    assert_eq!(api.tasks()[0].title, "Existing");
    assert!(!api.can_undo());

    // Undo is saved too.
    assert_eq!(open(dir.path()).tasks().len(), 1);
}

#[test]
fn unknown_index_is_an_error() {
    let dir = tempdir().unwrap();
    let mut api = open(dir.path());
    seed(&mut api);

    let err = api.delete_tasks(&["9"]).unwrap_err();
    assert!(err.to_string().contains("Index 9 not found"));
    assert_eq!(api.tasks().len(), 3);
}
