//! # Item Repository
//!
//! An ordered, in-memory list of tasks (newest first) plus the auxiliary
//! selection set used for batch operations.
//!
//! The repository does not validate; by the time a draft or patch gets here
//! the API has already run it through [`crate::validate`]. It also does not
//! know about history or persistence: the owning [`crate::api::TodozApi`]
//! records a snapshot and writes the payload after each mutating call.
//!
//! Operations addressing an identifier that is not present are no-ops, not
//! errors. Every mutator returns how many tasks it touched so callers can
//! report it.

use std::collections::{BTreeSet, HashSet};
use uuid::Uuid;

use crate::model::{Task, TaskDraft, TaskPatch, MAX_TITLE_LEN};

/// Appended to the title of a duplicated task.
pub const COPY_SUFFIX: &str = " (copy)";

#[derive(Debug, Clone, Default)]
pub struct TaskRepository {
    tasks: Vec<Task>,
    selected: Vec<Uuid>,
}

impl TaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository over an existing list, kept in the given order.
    ///
    /// Later duplicates of an id are dropped.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut repo = Self::new();
        repo.replace_all(tasks);
        repo
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    /// Inserts a new task at the front of the list and returns it.
    pub fn create(&mut self, draft: TaskDraft) -> &Task {
        self.tasks.insert(0, Task::from_draft(draft));
        &self.tasks[0]
    }

    /// Inserts a copy of a task at the front: fresh id and creation time,
    /// reopened, title suffixed with [`COPY_SUFFIX`] (the original title is
    /// shortened if the suffix would push it past the title limit).
    ///
    /// Returns the copy, or `None` for an unknown id.
    pub fn duplicate(&mut self, id: Uuid) -> Option<&Task> {
        let source = self.get(id)?;
        let keep = MAX_TITLE_LEN - COPY_SUFFIX.chars().count();
        let mut title: String = source.title.chars().take(keep).collect();
        title.push_str(COPY_SUFFIX);

        let draft = TaskDraft {
            title,
            description: source.description.clone(),
            priority: source.priority,
            category: source.category.clone(),
            due_date: source.due_date,
            is_completed: false,
        };
        Some(self.create(draft))
    }

    /// Duplicates every known id, in the order given, and returns the new ids.
    pub fn batch_duplicate(&mut self, ids: &[Uuid]) -> Vec<Uuid> {
        ids.iter()
            .filter_map(|id| self.duplicate(*id).map(Task::id))
            .collect()
    }

    pub fn update(&mut self, id: Uuid, patch: &TaskPatch) -> usize {
        match self.tasks.iter_mut().find(|t| t.id() == id) {
            Some(task) => {
                patch.apply_to(task);
                1
            }
            None => 0,
        }
    }

    pub fn delete(&mut self, id: Uuid) -> usize {
        self.batch_delete(&[id])
    }

    pub fn toggle_completion(&mut self, id: Uuid) -> usize {
        match self.tasks.iter_mut().find(|t| t.id() == id) {
            Some(task) => {
                task.is_completed = !task.is_completed;
                1
            }
            None => 0,
        }
    }

    pub fn batch_delete(&mut self, ids: &[Uuid]) -> usize {
        let ids: HashSet<Uuid> = ids.iter().copied().collect();
        let before = self.tasks.len();
        self.tasks.retain(|t| !ids.contains(&t.id()));
        self.selected.retain(|id| !ids.contains(id));
        before - self.tasks.len()
    }

    /// Sets (does not flip) the completion flag of every matching task.
    pub fn batch_set_completed(&mut self, ids: &[Uuid], completed: bool) -> usize {
        let ids: HashSet<Uuid> = ids.iter().copied().collect();
        let mut touched = 0;
        for task in self.tasks.iter_mut().filter(|t| ids.contains(&t.id())) {
            task.is_completed = completed;
            touched += 1;
        }
        touched
    }

    /// Flips the completion flag of every matching task individually.
    pub fn batch_toggle(&mut self, ids: &[Uuid]) -> usize {
        let ids: HashSet<Uuid> = ids.iter().copied().collect();
        let mut touched = 0;
        for task in self.tasks.iter_mut().filter(|t| ids.contains(&t.id())) {
            task.is_completed = !task.is_completed;
            touched += 1;
        }
        touched
    }

    pub fn batch_update(&mut self, ids: &[Uuid], patch: &TaskPatch) -> usize {
        let ids: HashSet<Uuid> = ids.iter().copied().collect();
        let mut touched = 0;
        for task in self.tasks.iter_mut().filter(|t| ids.contains(&t.id())) {
            patch.apply_to(task);
            touched += 1;
        }
        touched
    }

    pub fn delete_completed(&mut self) -> usize {
        let done: Vec<Uuid> = self
            .tasks
            .iter()
            .filter(|t| t.is_completed)
            .map(|t| t.id())
            .collect();
        self.batch_delete(&done)
    }

    /// Replaces the whole list, e.g. when restoring a snapshot or importing.
    ///
    /// Selection entries whose task no longer exists are dropped.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        let mut seen = HashSet::with_capacity(tasks.len());
        self.tasks = tasks.into_iter().filter(|t| seen.insert(t.id())).collect();
        self.selected.retain(|id| seen.contains(id));
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.tasks
            .iter()
            .map(|t| t.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    // --- Selection ---

    pub fn selected_ids(&self) -> &[Uuid] {
        &self.selected
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected.contains(&id)
    }

    /// Selects a task. Unknown ids and already-selected ids are ignored.
    pub fn select(&mut self, id: Uuid) -> bool {
        if self.contains(id) && !self.is_selected(id) {
            self.selected.push(id);
            true
        } else {
            false
        }
    }

    pub fn unselect(&mut self, id: Uuid) -> bool {
        let before = self.selected.len();
        self.selected.retain(|s| *s != id);
        before != self.selected.len()
    }

    pub fn toggle_select(&mut self, id: Uuid) -> bool {
        if self.is_selected(id) {
            self.unselect(id);
            false
        } else {
            self.select(id)
        }
    }

    /// Replaces the selection with the given ids (the currently visible tasks).
    pub fn select_all(&mut self, ids: &[Uuid]) {
        self.selected.clear();
        for id in ids {
            self.select(*id);
        }
    }

    pub fn unselect_all(&mut self) {
        self.selected.clear();
    }

    /// Selected tasks in list order.
    pub fn selected_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| self.selected.contains(&t.id()))
            .collect()
    }
}
