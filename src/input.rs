//! Input parsing for Claude Code hook JSON format
//!
//! Parses the JSON input from stdin that Claude Code sends to hooks.

use serde::Deserialize;
use std::borrow::Cow;

/// Main input structure from Claude Code hooks
#[derive(Debug, Deserialize)]
pub struct HookInput {
    /// Name of the tool being invoked (e.g., "Edit", "Write", "MultiEdit")
    pub tool_name: String,

    /// Tool-specific input parameters
    #[serde(default)]
    pub tool_input: ToolInput,

    /// Optional session identifier
    #[serde(default)]
    pub session_id: Option<String>,

    /// Hook event name (e.g., "PreToolUse")
    #[serde(default)]
    pub hook_event_name: Option<String>,

    /// Working directory of the session
    #[serde(default)]
    pub cwd: Option<String>,
}

/// Tool-specific input variants
#[derive(Debug, Clone)]
pub enum ToolInput {
    /// Single replacement in an existing file
    Edit {
        file_path: String,
        new_string: String,
    },

    /// Several replacements in one file
    MultiEdit {
        file_path: String,
        new_strings: Vec<String>,
    },

    /// Full file write
    Write {
        file_path: String,
        content: String,
    },

    /// Jupyter cell replacement
    NotebookEdit {
        notebook_path: String,
        new_source: String,
    },

    /// File read; carries no content
    Read {
        file_path: String,
    },

    /// Unknown tool - pass through
    Unknown {
        raw: serde_json::Value,
    },
}

impl Default for ToolInput {
    fn default() -> Self {
        ToolInput::Unknown {
            raw: serde_json::Value::Null,
        }
    }
}

impl<'de> Deserialize<'de> for ToolInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;

        match value.as_object().and_then(ToolInput::from_object) {
            Some(input) => Ok(input),
            None => Ok(ToolInput::Unknown { raw: value }),
        }
    }
}

impl ToolInput {
    /// Classify a tool_input object by the fields it carries
    fn from_object(obj: &serde_json::Map<String, serde_json::Value>) -> Option<Self> {
        let text = |key: &str| obj.get(key).and_then(|v| v.as_str()).map(String::from);

        if let (Some(notebook_path), Some(new_source)) = (text("notebook_path"), text("new_source")) {
            return Some(ToolInput::NotebookEdit {
                notebook_path,
                new_source,
            });
        }

        let file_path = text("file_path")?;

        // MultiEdit carries an array of {old_string, new_string}
        if let Some(edits) = obj.get("edits").and_then(|v| v.as_array()) {
            let new_strings = edits
                .iter()
                .filter_map(|e| e.get("new_string").and_then(|v| v.as_str()))
                .map(String::from)
                .collect();
            return Some(ToolInput::MultiEdit {
                file_path,
                new_strings,
            });
        }

        if let Some(new_string) = text("new_string") {
            return Some(ToolInput::Edit {
                file_path,
                new_string,
            });
        }

        if let Some(content) = text("content") {
            return Some(ToolInput::Write { file_path, content });
        }

        Some(ToolInput::Read { file_path })
    }
}

/// One proposed change, reduced to what the rules look at
#[derive(Debug, Clone)]
pub struct EditEvent<'a> {
    /// Tool name as sent by the host
    pub operation: &'a str,

    /// Target file
    pub file_path: &'a str,

    /// Proposed text; `None` for operations that do not change content
    pub content: Option<Cow<'a, str>>,
}

impl<'a> EditEvent<'a> {
    pub fn new(operation: &'a str, file_path: &'a str, content: impl Into<Cow<'a, str>>) -> Self {
        Self {
            operation,
            file_path,
            content: Some(content.into()),
        }
    }
}

impl HookInput {
    /// Parse input from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The edit this input proposes, if it targets a file
    pub fn edit_event(&self) -> Option<EditEvent<'_>> {
        let op = self.tool_name.as_str();
        match &self.tool_input {
            ToolInput::Edit {
                file_path,
                new_string,
            } => Some(EditEvent::new(op, file_path, new_string.as_str())),
            ToolInput::MultiEdit {
                file_path,
                new_strings,
            } => Some(EditEvent::new(op, file_path, new_strings.join("\n"))),
            ToolInput::Write { file_path, content } => {
                Some(EditEvent::new(op, file_path, content.as_str()))
            }
            ToolInput::NotebookEdit {
                notebook_path,
                new_source,
            } => Some(EditEvent::new(op, notebook_path, new_source.as_str())),
            ToolInput::Read { file_path } => Some(EditEvent {
                operation: op,
                file_path,
                content: None,
            }),
            ToolInput::Unknown { .. } => None,
        }
    }

    /// Target file path, if any
    pub fn file_path(&self) -> Option<&str> {
        match &self.tool_input {
            ToolInput::Edit { file_path, .. }
            | ToolInput::MultiEdit { file_path, .. }
            | ToolInput::Write { file_path, .. }
            | ToolInput::Read { file_path } => Some(file_path.as_str()),
            ToolInput::NotebookEdit { notebook_path, .. } => Some(notebook_path.as_str()),
            ToolInput::Unknown { .. } => None,
        }
    }

    /// Get a summary of the input for logging
    pub fn summary(&self) -> String {
        match self.file_path() {
            Some(path) => format!("{}: {}", self.tool_name, path),
            None => format!("Unknown tool: {}", self.tool_name),
        }
    }
}
