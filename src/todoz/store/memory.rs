use super::KeyValueStore;
use crate::error::{Result, TodozError};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory storage for testing and development.
/// Does NOT persist data.
///
/// Uses `RefCell` for interior mutability since todoz is single-threaded.
#[derive(Default)]
pub struct InMemoryStore {
    entries: RefCell<BTreeMap<String, Vec<u8>>>,
    simulate_write_error: RefCell<bool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `save` and `remove` fail until switched off again.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Raw stored value as text, for assertions.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.entries
            .borrow()
            .get(key)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    fn check_writable(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(TodozError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for InMemoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.check_writable()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Task, TaskDraft};
    use crate::persistence;

    pub struct StoreFixture {
        pub store: InMemoryStore,
        tasks: Vec<Task>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                tasks: Vec::new(),
            }
        }

        /// Adds a task in front of the list (newest first, like the repository).
        pub fn with_task(mut self, draft: TaskDraft) -> Self {
            self.tasks.insert(0, Task::from_draft(draft));
            self
        }

        pub fn with_tasks(mut self, count: usize) -> Self {
            for i in 0..count {
                self = self.with_task(TaskDraft::new(format!("Test Task {}", i + 1)));
            }
            self
        }

        pub fn with_completed_task(mut self, title: &str) -> Self {
            let mut task = Task::from_draft(TaskDraft::new(title));
            task.is_completed = true;
            self.tasks.insert(0, task);
            self
        }

        /// Writes the live payload and hands back the store.
        pub fn build(self) -> InMemoryStore {
            persistence::save_state(&self.store, &self.tasks, None).unwrap();
            self.store
        }
    }
}
