use tracing::warn;

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::settings::Settings;
use crate::store::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
    Reset,
}

pub fn run<S: KeyValueStore>(
    store: &S,
    settings: &mut Settings,
    action: SettingsAction,
) -> Result<CmdResult> {
    match action {
        SettingsAction::ShowAll => Ok(CmdResult::default().with_settings(settings.clone())),
        SettingsAction::ShowKey(key) => {
            let message = match settings.get(&key) {
                Some(value) => CmdMessage::info(value),
                None => CmdMessage::error(format!("Unknown settings key: {}", key)),
            };
            Ok(CmdResult::default().with_message(message))
        }
        SettingsAction::Set(key, value) => {
            let mut result = CmdResult::default();
            if let Err(e) = settings.set(&key, &value) {
                result.add_message(CmdMessage::error(e));
                return Ok(result);
            }
            save(store, settings, &mut result);
            let shown = settings.get(&key).unwrap_or(value);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, shown)));
            Ok(result.with_settings(settings.clone()))
        }
        SettingsAction::Reset => {
            *settings = Settings::default();
            let mut result = CmdResult::default();
            save(store, settings, &mut result);
            result.add_message(CmdMessage::success("Settings reset to defaults"));
            Ok(result.with_settings(settings.clone()))
        }
    }
}

fn save<S: KeyValueStore>(store: &S, settings: &Settings, result: &mut CmdResult) {
    if let Err(e) = settings.save(store) {
        warn!(error = %e, "failed to save settings");
        result.add_message(CmdMessage::warning(format!("Settings not saved: {}", e)));
    }
}
