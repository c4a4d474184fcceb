use crate::error::{Result, TodozError};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;
use uuid::Uuid;

/// A task's text as edited in `$EDITOR`.
/// Format: title\n\ndescription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorContent {
    pub title: String,
    pub description: String,
}

impl EditorContent {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn to_buffer(&self) -> String {
        if self.description.is_empty() {
            format!("{}\n\n", self.title)
        } else {
            format!("{}\n\n{}", self.title, self.description)
        }
    }

    /// First non-blank line is the title; everything after it is the description.
    pub fn from_buffer(buffer: &str) -> Self {
        let mut lines = buffer.lines().skip_while(|l| l.trim().is_empty());
        let title = lines.next().map(|l| l.trim().to_string()).unwrap_or_default();
        let rest: Vec<&str> = lines.collect();
        Self {
            title,
            description: rest.join("\n").trim().to_string(),
        }
    }

    /// Description as a task field: empty means none.
    pub fn description_opt(&self) -> Option<String> {
        if self.description.is_empty() {
            None
        } else {
            Some(self.description.clone())
        }
    }
}

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.trim().is_empty() {
                return Ok(editor);
            }
        }
    }

    for fallback in &["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok((*fallback).to_string());
        }
    }

    Err(TodozError::Api(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Opens a file in the user's editor and waits for it to close.
/// Returns the contents of the file after editing.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    let path = file_path.as_ref();

    // $EDITOR may carry arguments, e.g. "code --wait".
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or("vi");

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| TodozError::Api(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(TodozError::Api(format!(
            "Editor '{}' exited with non-zero status",
            editor
        )));
    }

    fs::read_to_string(path).map_err(TodozError::Io)
}

/// Opens an editor with initial content and returns the edited content.
pub fn edit_content(initial: &EditorContent) -> Result<EditorContent> {
    let temp_file = env::temp_dir().join(format!("todoz_edit_{}.txt", Uuid::new_v4()));

    fs::write(&temp_file, initial.to_buffer()).map_err(TodozError::Io)?;
    let result = open_in_editor(&temp_file);
    let _ = fs::remove_file(&temp_file);

    Ok(EditorContent::from_buffer(&result?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_buffer() {
        let ec = EditorContent::new("Call bank", "ask about fees");
        assert_eq!(ec.to_buffer(), "Call bank\n\nask about fees");
        assert_eq!(EditorContent::new("Call bank", "").to_buffer(), "Call bank\n\n");
    }

    #[test]
    fn test_from_buffer_normal() {
        let ec = EditorContent::from_buffer("Call bank\n\nask about fees\nand the card");
        assert_eq!(ec.title, "Call bank");
        assert_eq!(ec.description, "ask about fees\nand the card");
    }

    #[test]
    fn test_from_buffer_skips_leading_blank_lines() {
        let ec = EditorContent::from_buffer("\n\n  Title  \nbody");
        assert_eq!(ec.title, "Title");
        assert_eq!(ec.description, "body");
    }

    #[test]
    fn test_from_buffer_empty() {
        let ec = EditorContent::from_buffer("");
        assert_eq!(ec.title, "");
        assert_eq!(ec.description_opt(), None);
    }

    #[test]
    fn test_buffer_survives_editing_cycle() {
        let original = EditorContent::new("Title", "line one\nline two");
        assert_eq!(EditorContent::from_buffer(&original.to_buffer()), original);
    }
}
