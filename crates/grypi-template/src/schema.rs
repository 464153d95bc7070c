//! # Metadata Schema
//!
//! Checks applied to a parsed `metadata.json`, in order:
//!
//! 1. the document is a JSON object;
//! 2. `command` and `display_name` are present (all missing keys are
//!    reported together);
//! 3. `command` is a string and one of `init`, `generate`;
//! 4. `display_name` is a string;
//! 5. `dependencies`, `topic`, `methodology`, `keywords` are arrays when
//!    present;
//! 6. `description` and `author` are strings when present.

use serde_json::{Map, Value};

use grypi_core::{json_type, TemplateCommand, TemplateMetadata, LIST_FIELDS, REQUIRED_FIELDS};

use crate::error::{TemplateError, TemplateResult};

/// Optional keys that must be strings when present.
pub const STRING_FIELDS: [&str; 2] = ["description", "author"];

fn wrong_type(field: &str, expected: &'static str, found: &Value) -> TemplateError {
    TemplateError::WrongFieldType {
        field: field.to_string(),
        expected,
        found: json_type(found),
    }
}

/// Every required key absent from `record`, in declaration order.
pub fn missing_required(record: &Map<String, Value>) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|key| !record.contains_key(**key))
        .map(|key| key.to_string())
        .collect()
}

fn check_command(value: &Value) -> TemplateResult<TemplateCommand> {
    let name = value
        .as_str()
        .ok_or_else(|| wrong_type("command", "a string", value))?;
    TemplateCommand::from_name(name).ok_or_else(|| TemplateError::InvalidCommand {
        found: name.to_string(),
        allowed: TemplateCommand::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Run every schema check and return the typed view.
pub fn check_metadata(document: &Value) -> TemplateResult<TemplateMetadata> {
    let record = document
        .as_object()
        .ok_or_else(|| wrong_type("(root)", "an object", document))?;

    let missing = missing_required(record);
    if !missing.is_empty() {
        return Err(TemplateError::MissingMetadataFields { fields: missing });
    }

    check_command(&record["command"])?;

    if !record["display_name"].is_string() {
        return Err(wrong_type("display_name", "a string", &record["display_name"]));
    }

    for field in LIST_FIELDS {
        if let Some(value) = record.get(field) {
            if !value.is_array() {
                return Err(wrong_type(field, "a list", value));
            }
        }
    }

    for field in STRING_FIELDS {
        if let Some(value) = record.get(field) {
            if !value.is_string() {
                return Err(wrong_type(field, "a string", value));
            }
        }
    }

    serde_json::from_value(document.clone()).map_err(|e| TemplateError::WrongFieldType {
        field: format!("(root): {e}"),
        expected: "a template metadata record",
        found: json_type(document),
    })
}
