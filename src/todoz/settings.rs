use crate::error::{Result, TodozError};
use crate::model::Priority;
use crate::persistence::SETTINGS_KEY;
use crate::sort::{SortField, SortOrder};
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

const DEFAULT_CATEGORY: &str = "work";

/// Keys understood by [`Settings::get`] and [`Settings::set`].
pub const KEYS: [&str; 5] = [
    "theme",
    "defaultCategory",
    "defaultPriority",
    "sortBy",
    "sortOrder",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Invalid theme: {}", other)),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

/// User preferences, stored under `todo-settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,

    #[serde(default = "default_category")]
    pub default_category: String,

    #[serde(default)]
    pub default_priority: Priority,

    #[serde(default)]
    pub sort_by: SortField,

    #[serde(default)]
    pub sort_order: SortOrder,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            default_category: default_category(),
            default_priority: Priority::default(),
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

/// Partial settings. Fields left `None` keep their current value.
///
/// Also the shape accepted from backup documents, so unknown or missing keys
/// are fine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl Settings {
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(category) = patch.default_category {
            self.default_category = category;
        }
        if let Some(priority) = patch.default_priority {
            self.default_priority = priority;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "theme" => Some(self.theme.to_string()),
            "defaultCategory" => Some(self.default_category.clone()),
            "defaultPriority" => Some(self.default_priority.to_string()),
            "sortBy" => Some(self.sort_by.to_string()),
            "sortOrder" => Some(self.sort_order.to_string()),
            _ => None,
        }
    }

    /// Sets one key from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "theme" => self.theme = value.parse()?,
            "defaultCategory" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err("defaultCategory cannot be empty".to_string());
                }
                self.default_category = value.to_string();
            }
            "defaultPriority" => {
                self.default_priority = value.parse().map_err(|e| format!("{}", e))?
            }
            "sortBy" => self.sort_by = value.parse()?,
            "sortOrder" => self.sort_order = value.parse()?,
            _ => return Err(format!("Unknown settings key: {}", key)),
        }
        Ok(())
    }

    /// Reads settings, falling back to defaults when absent or unreadable.
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        match Self::try_load(store) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "settings unreadable, using defaults");
                Self::default()
            }
        }
    }

    pub fn try_load<S: KeyValueStore>(store: &S) -> Result<Self> {
        match store.load(SETTINGS_KEY)? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(TodozError::Serialization),
            None => Ok(Self::default()),
        }
    }

    pub fn save<S: KeyValueStore>(&self, store: &S) -> Result<()> {
        let bytes = serde_json::to_vec(self).map_err(TodozError::Serialization)?;
        store.save(SETTINGS_KEY, &bytes)
    }
}
