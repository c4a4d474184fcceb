//! # Commands
//!
//! One module per operation. Commands hold the business logic: they check
//! input, mutate the repository (or history, selection, settings) and describe
//! the outcome in a [`CmdResult`].
//!
//! Commands never print and never persist the task list. Recording a history
//! snapshot and writing the live payload after a mutation is done once, in
//! [`crate::api::TodozApi`], so no command can forget it.

use uuid::Uuid;

use crate::index::DisplayTask;
use crate::model::Task;
use crate::persistence::StorageInfo;
use crate::repository::TaskRepository;
use crate::settings::Settings;
use crate::stats::{DetailedStats, TaskStats};

pub mod add;
pub mod data;
pub mod delete;
pub mod duplicate;
pub mod export;
pub mod filter;
pub mod history;
pub mod import;
pub mod list;
pub mod select;
pub mod settings;
pub mod stats;
pub mod toggle;
pub mod update;
pub mod view;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_tasks: Vec<Task>,
    pub listed_tasks: Vec<DisplayTask>,
    pub stats: Option<TaskStats>,
    pub detailed_stats: Option<DetailedStats>,
    pub categories: Vec<String>,
    pub settings: Option<Settings>,
    pub exported: Option<String>,
    pub storage: Option<StorageInfo>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_affected_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.affected_tasks = tasks;
        self
    }

    pub fn with_listed_tasks(mut self, tasks: Vec<DisplayTask>) -> Self {
        self.listed_tasks = tasks;
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }
}

/// Current copies of the tasks with the given ids, in list order.
pub(crate) fn tasks_by_ids(repo: &TaskRepository, ids: &[Uuid]) -> Vec<Task> {
    repo.tasks()
        .iter()
        .filter(|t| ids.contains(&t.id()))
        .cloned()
        .collect()
}

/// "1 task" / "3 tasks".
pub(crate) fn plural(count: usize) -> String {
    if count == 1 {
        "1 task".to_string()
    } else {
        format!("{} tasks", count)
    }
}
