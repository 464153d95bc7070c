//! # Metadata Ledger
//!
//! Every released version's template metadata, as a JSON list ordered by
//! release. Older ledgers were a map from version to metadata; they are
//! converted to the list form, each record stamped with its version, the
//! first time they are read.
//!
//! The ledger is read from `<index root>/<repository name>/metadata.json`
//! and the combined list is written over the template's own
//! `metadata.json`, where the publishing workflow picks it up. A tag that
//! is not a release version makes the run a dry run: the list is still
//! written, then [`LedgerError::DryRun`] is returned.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use grypi_core::{json_type, read_json, GithubContext, SiteLayout, VersionStyle};

use crate::error::{LedgerError, LedgerResult};

/// Key stamped on every record.
pub const VERSION_KEY: &str = "version";

/// Convert a legacy `{version: metadata}` map to the list form.
pub fn legacy_to_list(path: &Path, legacy: Map<String, Value>) -> LedgerResult<Vec<Value>> {
    legacy
        .into_iter()
        .map(|(version, record)| match record {
            Value::Object(mut fields) => {
                fields.insert(VERSION_KEY.to_string(), Value::String(version));
                Ok(Value::Object(fields))
            }
            _ => Err(LedgerError::LegacyRecord {
                path: path.to_path_buf(),
                version,
            }),
        })
        .collect()
}

/// Read a ledger, converting the legacy form. `None` when the file does
/// not exist.
pub fn load_ledger(path: &Path) -> LedgerResult<Option<Vec<Value>>> {
    if !path.exists() {
        return Ok(None);
    }
    match read_json(path)? {
        Value::Array(records) => Ok(Some(records)),
        Value::Object(legacy) => {
            tracing::info!(path = %path.display(), "converting legacy ledger to list form");
            legacy_to_list(path, legacy).map(Some)
        }
        other => Err(LedgerError::UnexpectedShape {
            path: path.to_path_buf(),
            found: json_type(&other),
        }),
    }
}

/// Result of a ledger update that was not a dry run.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerUpdate {
    pub records: Vec<Value>,
    /// Whether no ledger existed and the list was started from the new record.
    pub seeded: bool,
    pub written_to: PathBuf,
}

/// Appends the released version's metadata to the package ledger.
#[derive(Debug, Clone)]
pub struct LedgerUpdater {
    layout: SiteLayout,
    style: VersionStyle,
}

impl LedgerUpdater {
    /// Updater accepting `v`-prefixed release tags.
    pub fn new(layout: SiteLayout) -> Self {
        Self {
            layout,
            style: VersionStyle::Prefixed,
        }
    }

    pub fn with_style(mut self, style: VersionStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> VersionStyle {
        self.style
    }

    pub fn update(&self, ctx: &GithubContext) -> LedgerResult<LedgerUpdate> {
        let repo_name = ctx.repo_name()?;
        let tag = ctx.tag()?;
        let dry_run = !self.style.matches(tag);
        if dry_run {
            tracing::warn!(tag, "tag is not a release version, running dry");
        }

        let source = self.layout.template_metadata();
        let mut record = match read_json(&source)? {
            Value::Object(fields) => fields,
            other => {
                return Err(LedgerError::NotAnObject {
                    path: source,
                    found: json_type(&other),
                })
            }
        };
        record.insert(VERSION_KEY.to_string(), Value::String(tag.to_string()));
        let record = Value::Object(record);

        let ledger_path = self.layout.package_ledger(repo_name);
        let (records, seeded) = match load_ledger(&ledger_path)? {
            Some(mut records) => {
                records.push(record);
                (records, false)
            }
            None => {
                tracing::debug!(path = %ledger_path.display(), "no ledger yet, starting one");
                (vec![record], true)
            }
        };

        let text = Value::Array(records.clone()).to_string();
        std::fs::write(&source, text).map_err(|e| LedgerError::Io {
            path: source.clone(),
            source: e,
        })?;
        tracing::info!(
            package = repo_name,
            tag,
            versions = records.len(),
            path = %source.display(),
            "wrote ledger"
        );

        if dry_run {
            return Err(LedgerError::DryRun {
                tag: tag.to_string(),
            });
        }
        Ok(LedgerUpdate {
            records,
            seeded,
            written_to: source,
        })
    }
}
