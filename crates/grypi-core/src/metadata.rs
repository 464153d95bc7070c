//! # Template Metadata
//!
//! The `metadata.json` record shipped with every package template.
//!
//! Schema checks (which keys are required, which must be lists) live in
//! `grypi-template` so that failures can be reported in a fixed order.
//! This module only defines the shape and the typed view obtained once
//! those checks pass.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GrypiError, GrypiResult};

/// Keys every `metadata.json` must carry.
pub const REQUIRED_FIELDS: [&str; 2] = ["command", "display_name"];

/// Optional keys that must be JSON arrays when present.
pub const LIST_FIELDS: [&str; 4] = ["dependencies", "topic", "methodology", "keywords"];

/// What the template does when invoked by the installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCommand {
    /// Scaffold a new project.
    Init,
    /// Generate files into an existing project.
    Generate,
}

impl TemplateCommand {
    /// Every accepted value, in the order they are listed in error messages.
    pub const ALL: [TemplateCommand; 2] = [Self::Init, Self::Generate];

    /// The JSON spelling of this command.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Generate => "generate",
        }
    }

    /// Look up a command by its JSON spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for TemplateCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed view of a validated `metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub command: TemplateCommand,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methodology: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<Value>>,
    /// Keys grypi does not interpret, kept so records round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TemplateMetadata {
    /// Dependency names declared as strings. Non-string entries are skipped.
    pub fn dependency_names(&self) -> Vec<&str> {
        self.dependencies
            .iter()
            .flatten()
            .filter_map(Value::as_str)
            .collect()
    }
}

/// JSON type name used in error messages.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Read and parse a JSON document.
pub fn read_json(path: &Path) -> GrypiResult<Value> {
    let text = std::fs::read_to_string(path).map_err(|source| GrypiError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| GrypiError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}
