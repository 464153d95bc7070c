//! # Template Validator
//!
//! Read-only consistency check of a package template: the structure
//! checks of [`crate::structure`] followed by the schema checks of
//! [`crate::schema`]. The first failure ends the run.

use std::path::Path;

use serde_json::Value;

use grypi_core::TemplateMetadata;

use crate::error::{TemplateError, TemplateResult};
use crate::schema::check_metadata;
use crate::structure::{check_structure, TemplateFiles, ValidationProfile};

/// A template that passed every check.
#[derive(Debug, Clone)]
pub struct ValidatedTemplate {
    pub files: TemplateFiles,
    pub metadata: TemplateMetadata,
}

/// Validates template directories against one [`ValidationProfile`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateValidator {
    profile: ValidationProfile,
}

impl TemplateValidator {
    pub fn new(profile: ValidationProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> ValidationProfile {
        self.profile
    }

    /// Check the template rooted at `root`.
    pub fn validate(&self, root: &Path) -> TemplateResult<ValidatedTemplate> {
        let files = check_structure(root, self.profile)?;

        let text = std::fs::read_to_string(&files.metadata).map_err(|source| TemplateError::Io {
            path: files.metadata.clone(),
            source,
        })?;
        let document: Value =
            serde_json::from_str(&text).map_err(|source| TemplateError::MetadataParse {
                path: files.metadata.clone(),
                source,
            })?;
        let metadata = check_metadata(&document)?;

        tracing::info!(
            root = %root.display(),
            command = %metadata.command,
            display_name = %metadata.display_name,
            "template is consistent"
        );

        Ok(ValidatedTemplate { files, metadata })
    }
}
