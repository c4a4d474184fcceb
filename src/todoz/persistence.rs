//! # Stored Payloads
//!
//! What the bytes under each storage key mean. The store itself is a plain
//! key-value byte map (see [`crate::store`]); this module owns the JSON shapes
//! and the rules for reading them back.
//!
//! ## Keys
//!
//! | key             | contents                                   |
//! |-----------------|--------------------------------------------|
//! | `todo-storage`  | live payload: the task list                |
//! | `todo-settings` | [`Settings`]                               |
//! | `todo-backup`   | a backup document, same shape as an export |
//!
//! ## Live Payload
//!
//! ```text
//! { "state": { "todos": [ ... ], "filter": { ... } }, "version": 1 }
//! ```
//!
//! `filter` is optional. It is accepted when present but never written.
//!
//! ## Backup Document
//!
//! ```text
//! { "version": 1, "timestamp": 1767139200000, "todos": [ ... ], "settings": { ... } }
//! ```
//!
//! Importing requires a non-zero `version` and a `todos` array. Every task is
//! validated, ids must be unique, and one bad task rejects the whole document; nothing is written
//! until the document has been fully checked.

use chrono::serde::ts_milliseconds;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

use crate::error::{Result, TodozError};
use crate::filter::FilterCriteria;
use crate::model::Task;
use crate::settings::{Settings, SettingsPatch};
use crate::store::KeyValueStore;
use crate::validate::validate_task;

pub const TASKS_KEY: &str = "todo-storage";
pub const SETTINGS_KEY: &str = "todo-settings";
pub const BACKUP_KEY: &str = "todo-backup";

pub const CURRENT_VERSION: u32 = 1;

/// Nominal storage quota reported by [`storage_info`].
pub const STORAGE_QUOTA: usize = 5 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize)]
struct LivePayload {
    state: LiveState,
    #[serde(default = "current_version")]
    version: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LiveState {
    #[serde(default)]
    todos: Vec<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filter: Option<FilterCriteria>,
}

fn current_version() -> u32 {
    CURRENT_VERSION
}

/// What a session starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedState {
    pub tasks: Vec<Task>,
    pub filter: Option<FilterCriteria>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backup {
    pub version: u32,
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub todos: Vec<Task>,
    pub settings: Settings,
}

impl Backup {
    pub fn new(tasks: &[Task], settings: &Settings) -> Self {
        Self {
            version: CURRENT_VERSION,
            timestamp: Utc::now().trunc_subsecs(3),
            todos: tasks.to_vec(),
            settings: settings.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(TodozError::Serialization)
    }
}

/// A backup document that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedData {
    pub tasks: Vec<Task>,
    pub settings: Option<SettingsPatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StorageInfo {
    pub used: usize,
    pub total: usize,
    pub percentage: u32,
}

pub fn try_load_state<S: KeyValueStore>(store: &S) -> Result<LoadedState> {
    let Some(bytes) = store.load(TASKS_KEY)? else {
        return Ok(LoadedState::default());
    };
    let payload: LivePayload = serde_json::from_slice(&bytes).map_err(TodozError::Serialization)?;
    Ok(LoadedState {
        tasks: payload.state.todos,
        filter: payload.state.filter,
    })
}

/// Reads the live payload, starting empty when it is absent or unreadable.
pub fn load_state<S: KeyValueStore>(store: &S) -> LoadedState {
    match try_load_state(store) {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, key = TASKS_KEY, "stored tasks unreadable, starting empty");
            LoadedState::default()
        }
    }
}

pub fn save_state<S: KeyValueStore>(
    store: &S,
    tasks: &[Task],
    filter: Option<&FilterCriteria>,
) -> Result<()> {
    let payload = LivePayload {
        state: LiveState {
            todos: tasks.to_vec(),
            filter: filter.cloned(),
        },
        version: CURRENT_VERSION,
    };
    let bytes = serde_json::to_vec(&payload).map_err(TodozError::Serialization)?;
    store.save(TASKS_KEY, &bytes)
}

/// Checks a backup document and returns its contents. Writes nothing.
pub fn parse_backup(json: &str) -> Result<ImportedData> {
    let doc: Value = serde_json::from_str(json)
        .map_err(|e| TodozError::Import(format!("not valid JSON: {}", e)))?;

    let obj = doc
        .as_object()
        .ok_or_else(|| TodozError::Import("expected a JSON object".to_string()))?;

    if !obj.get("version").is_some_and(is_truthy) {
        return Err(TodozError::Import("missing version".to_string()));
    }

    let todos = match obj.get("todos") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(TodozError::Import("todos must be an array".to_string())),
        None => return Err(TodozError::Import("missing todos".to_string())),
    };

    let mut tasks = Vec::with_capacity(todos.len());
    let mut seen = HashSet::with_capacity(todos.len());
    for (i, item) in todos.iter().enumerate() {
        let task: Task = serde_json::from_value(item.clone())
            .map_err(|e| TodozError::Import(format!("task {}: {}", i + 1, e)))?;
        validate_task(&task).map_err(|e| TodozError::Import(format!("task {}: {}", i + 1, e)))?;
        if !seen.insert(task.id()) {
            return Err(TodozError::Import(format!(
                "task {}: duplicate id {}",
                i + 1,
                task.id()
            )));
        }
        tasks.push(task);
    }

    let settings = match obj.get("settings") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            serde_json::from_value::<SettingsPatch>(value.clone())
                .map_err(|e| TodozError::Import(format!("settings: {}", e)))?,
        ),
    };

    Ok(ImportedData { tasks, settings })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn create_backup<S: KeyValueStore>(
    store: &S,
    tasks: &[Task],
    settings: &Settings,
) -> Result<()> {
    let json = Backup::new(tasks, settings).to_json()?;
    store.save(BACKUP_KEY, json.as_bytes())
}

/// Reads and checks the stored backup.
pub fn load_backup<S: KeyValueStore>(store: &S) -> Result<ImportedData> {
    let bytes = store
        .load(BACKUP_KEY)?
        .ok_or_else(|| TodozError::Import("no backup found".to_string()))?;
    parse_backup(&String::from_utf8_lossy(&bytes))
}

/// Removes tasks, settings and backup.
///
/// Every key is attempted even after a failure; the first error is returned.
pub fn clear_all_data<S: KeyValueStore>(store: &S) -> Result<()> {
    let mut first_error = None;
    for key in [TASKS_KEY, SETTINGS_KEY, BACKUP_KEY] {
        if let Err(e) = store.remove(key) {
            warn!(key, error = %e, "failed to remove stored data");
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// Bytes stored across every key (values plus key names) against the quota.
pub fn storage_info<S: KeyValueStore>(store: &S) -> Result<StorageInfo> {
    let mut used = 0;
    for key in store.keys()? {
        if let Some(bytes) = store.load(&key)? {
            used += bytes.len() + key.len();
        }
    }
    let percentage = (used as f64 / STORAGE_QUOTA as f64 * 100.0).round() as u32;
    Ok(StorageInfo {
        used,
        total: STORAGE_QUOTA,
        percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::StatusFilter;
    use crate::model::{Priority, TaskDraft};
    use crate::store::memory::InMemoryStore;

    fn sample() -> Vec<Task> {
        vec![
            Task::from_draft(TaskDraft::new("B").with_priority(Priority::Low)),
            Task::from_draft(TaskDraft::new("A").with_category("home")),
        ]
    }

    #[test]
    fn load_from_empty_store() {
        let store = InMemoryStore::new();
        assert_eq!(load_state(&store), LoadedState::default());
    }

    #[test]
    fn save_then_load_keeps_order() {
        let store = InMemoryStore::new();
        let tasks = sample();
        save_state(&store, &tasks, None).unwrap();

        let raw: Value = serde_json::from_str(&store.get_string(TASKS_KEY).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert!(raw["state"]["todos"].is_array());
        assert!(raw["state"].get("filter").is_none());

        assert_eq!(load_state(&store).tasks, tasks);
    }

    #[test]
    fn accepts_payload_with_filter() {
        let store = InMemoryStore::new();
        store
            .save(
                TASKS_KEY,
                br#"{"state":{"todos":[],"filter":{"status":"active","priority":"all","category":"all","searchQuery":""}},"version":1}"#,
            )
            .unwrap();
        let state = try_load_state(&store).unwrap();
        assert_eq!(state.filter.unwrap().status, StatusFilter::Active);
    }

    #[test]
    fn corrupt_payload_starts_empty() {
        let store = InMemoryStore::new();
        store.save(TASKS_KEY, b"{oops").unwrap();
        assert!(try_load_state(&store).is_err());
        assert!(load_state(&store).tasks.is_empty());
    }

    #[test]
    fn export_then_parse() {
        let tasks = sample();
        let json = Backup::new(&tasks, &Settings::default()).to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert!(value["timestamp"].is_i64());
        assert_eq!(value["settings"]["defaultCategory"], "work");

        let imported = parse_backup(&json).unwrap();
        assert_eq!(imported.tasks, tasks);
        assert_eq!(
            imported.settings.unwrap().default_category.as_deref(),
            Some("work")
        );
    }

    #[test]
    fn rejects_malformed_documents() {
        for doc in [
            r#"{"foo": 1}"#,
            r#"{"version": 1}"#,
            r#"{"todos": []}"#,
            r#"{"version": 0, "todos": []}"#,
            r#"{"version": 1, "todos": {}}"#,
            r#"[1, 2]"#,
            "not json",
        ] {
            let err = parse_backup(doc).unwrap_err();
            assert!(matches!(err, TodozError::Import(_)), "{} -> {:?}", doc, err);
        }
    }

    #[test]
    fn rejects_invalid_task() {
        let doc = r#"{"version":1,"todos":[{
            "id":"6f1c1f0e-8c1a-4d7e-9a57-1b1f8d7f7a10","title":"   ",
            "isCompleted":false,"priority":"low","category":"x","createdAt":1
        }]}"#;
        let err = parse_backup(doc).unwrap_err();
        assert!(err.to_string().contains("task 1"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let task = Task::from_draft(TaskDraft::new("twice"));
        let json = Backup::new(&[task.clone(), task], &Settings::default())
            .to_json()
            .unwrap();
        let err = parse_backup(&json).unwrap_err();
        assert!(err.to_string().contains("task 2: duplicate id"), "{}", err);
    }

    #[test]
    fn partial_settings_are_a_patch() {
        let doc = r#"{"version":1,"todos":[],"settings":{"theme":"dark"}}"#;
        let imported = parse_backup(doc).unwrap();
        let patch = imported.settings.unwrap();
        assert!(patch.theme.is_some());
        assert!(patch.default_category.is_none());
    }

    #[test]
    fn backup_restore_and_clear() {
        let store = InMemoryStore::new();
        assert!(load_backup(&store).is_err());

        let tasks = sample();
        create_backup(&store, &tasks, &Settings::default()).unwrap();
        assert_eq!(load_backup(&store).unwrap().tasks, tasks);

        save_state(&store, &tasks, None).unwrap();
        Settings::default().save(&store).unwrap();
        clear_all_data(&store).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    /// Refuses to remove one key, removes the rest.
    struct StuckKeyStore {
        inner: InMemoryStore,
        stuck: &'static str,
    }

    impl KeyValueStore for StuckKeyStore {
        fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.inner.load(key)
        }

        fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
            self.inner.save(key, bytes)
        }

        fn remove(&self, key: &str) -> Result<()> {
            if key == self.stuck {
                return Err(TodozError::Store(format!("cannot remove {}", key)));
            }
            self.inner.remove(key)
        }

        fn keys(&self) -> Result<Vec<String>> {
            self.inner.keys()
        }
    }

    #[test]
    fn clear_keeps_going_after_a_failed_remove() {
        let store = StuckKeyStore {
            inner: InMemoryStore::new(),
            stuck: TASKS_KEY,
        };
        let tasks = sample();
        save_state(&store, &tasks, None).unwrap();
        Settings::default().save(&store).unwrap();
        create_backup(&store, &tasks, &Settings::default()).unwrap();

        let err = clear_all_data(&store).unwrap_err();
        assert_eq!(err.to_string(), format!("Store error: cannot remove {}", TASKS_KEY));
        assert_eq!(store.keys().unwrap(), vec![TASKS_KEY.to_string()]);
    }

    #[test]
    fn storage_usage() {
        let store = InMemoryStore::new();
        assert_eq!(storage_info(&store).unwrap().used, 0);

        store.save("k", b"12345").unwrap();
        let info = storage_info(&store).unwrap();
        assert_eq!(info.used, 6);
        assert_eq!(info.total, STORAGE_QUOTA);
        assert_eq!(info.percentage, 0);
    }
}
