//! # API Facade
//!
//! [`TodozApi`] is the single entry point for every todoz operation, whatever
//! the UI. It is also the single owner of session state:
//!
//! - the [`TaskRepository`] (task list plus selection)
//! - the [`History`] of snapshots
//! - the active [`FilterCriteria`]
//! - the [`Settings`]
//! - the [`KeyValueStore`] everything is persisted through
//!
//! ## Mutation Pipeline
//!
//! Every mutating call follows the same path:
//!
//! ```text
//! selectors -> ids -> commands::*::run (validate, mutate) -> commit
//!                                                            |- history.record
//!                                                            '- save live payload
//! ```
//!
//! The commit records exactly one snapshot per call, even when nothing matched.
//! Saving is best effort: a failed write is logged, reported as a warning
//! message, and the in-memory change stays.
//!
//! Undo and redo swap the list for a snapshot and save it, but never record.
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Presentation**: it returns [`CmdResult`] values, never strings on stdout
//!
//! ## Generic Over KeyValueStore
//!
//! - Production: `TodozApi<FileStore>`
//! - Testing: `TodozApi<InMemoryStore>`

use chrono::Local;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::commands::{self, list::ListOrder};
use crate::error::Result;
use crate::filter::{FilterCriteria, FilterPatch};
use crate::history::{History, MAX_HISTORY};
use crate::index::{self, DisplayTask};
use crate::model::{Task, TaskDraft, TaskPatch};
use crate::persistence::{self, load_state};
use crate::repository::TaskRepository;
use crate::settings::Settings;
use crate::sort::{SortField, SortOrder};
use crate::store::KeyValueStore;

pub use crate::commands::settings::SettingsAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

pub struct TodozApi<S: KeyValueStore> {
    store: S,
    repo: TaskRepository,
    history: History,
    filter: FilterCriteria,
    settings: Settings,
}

impl<S: KeyValueStore> TodozApi<S> {
    /// Loads tasks and settings from `store`. Unreadable data starts empty.
    pub fn new(store: S) -> Self {
        Self::with_history_capacity(store, MAX_HISTORY)
    }

    pub fn with_history_capacity(store: S, capacity: usize) -> Self {
        let loaded = load_state(&store);
        let settings = Settings::load(&store);
        let repo = TaskRepository::from_tasks(loaded.tasks);

        // Baseline: undoing everything lands back on the loaded list.
        let mut history = History::with_capacity(capacity);
        history.record(repo.tasks());

        debug!(tasks = repo.len(), "session started");
        Self {
            store,
            repo,
            history,
            filter: loaded.filter.unwrap_or_default(),
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tasks(&self) -> &[Task] {
        self.repo.tasks()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn selected_ids(&self) -> &[Uuid] {
        self.repo.selected_ids()
    }

    // --- Mutations ---

    pub fn add_task(&mut self, draft: TaskDraft) -> Result<CmdResult> {
        let mut result = commands::add::run(&mut self.repo, draft)?;
        self.commit(&mut result);
        Ok(result)
    }

    pub fn update_tasks<I: AsRef<str>>(&mut self, selectors: &[I], patch: &TaskPatch) -> Result<CmdResult> {
        let ids = self.resolve(selectors)?;
        let mut result = commands::update::run(&mut self.repo, &ids, patch)?;
        self.commit(&mut result);
        Ok(result)
    }

    pub fn delete_tasks<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult> {
        let ids = self.resolve(selectors)?;
        let mut result = commands::delete::run(&mut self.repo, &ids)?;
        self.commit(&mut result);
        Ok(result)
    }

    /// Copies tasks under fresh ids; the copies land at the front, reopened.
    pub fn duplicate_tasks<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult> {
        let ids = self.resolve(selectors)?;
        let mut result = commands::duplicate::run(&mut self.repo, &ids)?;
        self.commit(&mut result);
        Ok(result)
    }

    pub fn clear_completed(&mut self) -> Result<CmdResult> {
        let mut result = commands::delete::completed(&mut self.repo)?;
        self.commit(&mut result);
        Ok(result)
    }

    pub fn toggle_tasks<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult> {
        let ids = self.resolve(selectors)?;
        let mut result = commands::toggle::run(&mut self.repo, &ids)?;
        self.commit(&mut result);
        Ok(result)
    }

    pub fn set_completed<I: AsRef<str>>(&mut self, selectors: &[I], completed: bool) -> Result<CmdResult> {
        let ids = self.resolve(selectors)?;
        let mut result = commands::toggle::set_completed(&mut self.repo, &ids, completed)?;
        self.commit(&mut result);
        Ok(result)
    }

    pub fn import_json(&mut self, json: &str) -> Result<CmdResult> {
        let mut result = commands::import::run(&mut self.repo, &mut self.settings, json)?;
        self.commit(&mut result);
        self.persist_settings(&mut result);
        Ok(result)
    }

    pub fn restore_backup(&mut self) -> Result<CmdResult> {
        let mut result = commands::data::restore(&self.store, &mut self.repo, &mut self.settings)?;
        self.commit(&mut result);
        self.persist_settings(&mut result);
        Ok(result)
    }

    /// Deletes all stored data. The emptied list is recorded, so it can be undone.
    pub fn reset_data(&mut self) -> Result<CmdResult> {
        let result = commands::data::reset(&self.store, &mut self.repo, &mut self.settings)?;
        self.history.record(self.repo.tasks());
        Ok(result)
    }

    pub fn undo(&mut self) -> Result<CmdResult> {
        let before = self.history.cursor();
        let mut result = commands::history::undo(&mut self.repo, &mut self.history)?;
        if self.history.cursor() != before {
            self.persist(&mut result);
        }
        Ok(result)
    }

    pub fn redo(&mut self) -> Result<CmdResult> {
        let before = self.history.cursor();
        let mut result = commands::history::redo(&mut self.repo, &mut self.history)?;
        if self.history.cursor() != before {
            self.persist(&mut result);
        }
        Ok(result)
    }

    // --- Queries ---

    /// Lists tasks matching the active filter narrowed by `extra`.
    ///
    /// `sort` overrides the display order only; indexes always follow settings.
    pub fn list_tasks(&self, extra: FilterPatch, sort: Option<(SortField, SortOrder)>) -> Result<CmdResult> {
        let mut criteria = self.filter.clone();
        criteria.merge(extra);
        let index_by = self.index_order();
        let order = ListOrder {
            index_by,
            display_by: sort.unwrap_or(index_by),
        };
        commands::list::run(&self.repo, &criteria, order, &Local::now())
    }

    pub fn view_tasks<I: AsRef<str>>(&self, selectors: &[I]) -> Result<CmdResult> {
        let ids = self.resolve(selectors)?;
        commands::view::run(&self.indexed(), &ids)
    }

    pub fn stats(&self, detailed: bool) -> Result<CmdResult> {
        commands::stats::run(self.repo.tasks(), detailed, &Local::now())
    }

    pub fn categories(&self) -> Result<CmdResult> {
        commands::list::categories(&self.repo)
    }

    pub fn export(&self) -> Result<CmdResult> {
        commands::export::run(self.repo.tasks(), &self.settings)
    }

    pub fn create_backup(&self) -> Result<CmdResult> {
        commands::data::backup(&self.store, &self.repo, &self.settings)
    }

    pub fn storage_info(&self) -> Result<CmdResult> {
        commands::data::info(&self.store)
    }

    pub fn settings_action(&mut self, action: SettingsAction) -> Result<CmdResult> {
        commands::settings::run(&self.store, &mut self.settings, action)
    }

    // --- Selection and filter (session only) ---

    pub fn select<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult> {
        let ids = self.resolve(selectors)?;
        commands::select::select(&mut self.repo, &ids)
    }

    pub fn unselect<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult> {
        let ids = self.resolve(selectors)?;
        commands::select::unselect(&mut self.repo, &ids)
    }

    pub fn toggle_select<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult> {
        let ids = self.resolve(selectors)?;
        commands::select::toggle(&mut self.repo, &ids)
    }

    /// Selects exactly the tasks passing the active filter.
    pub fn select_all(&mut self) -> Result<CmdResult> {
        let now = Local::now();
        let visible: Vec<Uuid> = self
            .repo
            .tasks()
            .iter()
            .filter(|t| self.filter.matches(t, &now))
            .map(|t| t.id())
            .collect();
        commands::select::select_all(&mut self.repo, &visible)
    }

    pub fn unselect_all(&mut self) -> Result<CmdResult> {
        commands::select::unselect_all(&mut self.repo)
    }

    pub fn selected(&self) -> Result<CmdResult> {
        commands::select::list(&self.repo, &self.indexed())
    }

    pub fn set_filter(&mut self, patch: FilterPatch) -> Result<CmdResult> {
        commands::filter::set(&mut self.filter, patch)
    }

    pub fn reset_filter(&mut self) -> Result<CmdResult> {
        commands::filter::reset(&mut self.filter)
    }

    // --- Internals ---

    /// Parses selectors and turns them into ids against the canonical listing.
    pub fn resolve<I: AsRef<str>>(&self, selectors: &[I]) -> Result<Vec<Uuid>> {
        let parsed = index::parse_selectors(selectors)?;
        index::resolve_selectors(&self.indexed(), self.repo.selected_ids(), &parsed)
    }

    fn index_order(&self) -> (SortField, SortOrder) {
        (self.settings.sort_by, self.settings.sort_order)
    }

    fn indexed(&self) -> Vec<DisplayTask> {
        let (field, order) = self.index_order();
        index::index_tasks(self.repo.tasks(), field, order)
    }

    fn commit(&mut self, result: &mut CmdResult) {
        self.history.record(self.repo.tasks());
        self.persist(result);
    }

    fn persist(&self, result: &mut CmdResult) {
        if let Err(e) = persistence::save_state(&self.store, self.repo.tasks(), None) {
            warn!(error = %e, "failed to save tasks, keeping changes in memory");
            result.add_message(CmdMessage::warning(format!(
                "Changes not saved: {}",
                e
            )));
        }
    }

    fn persist_settings(&self, result: &mut CmdResult) {
        if result.settings.is_none() {
            return;
        }
        if let Err(e) = self.settings.save(&self.store) {
            warn!(error = %e, "failed to save settings");
            result.add_message(CmdMessage::warning(format!("Settings not saved: {}", e)));
        }
    }
}
