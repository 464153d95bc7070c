//! # Issue-Style Arguments
//!
//! Index operations take a flat set of named arguments whose keys are the
//! human labels of a GitHub issue form (`package name`, `short
//! description`, ...). They can be given as `key=value` pairs or parsed
//! from the body of an issue created from such a form:
//!
//! ```text
//! ### Package name
//!
//! acme-tool
//!
//! ### Version
//!
//! 1.2.3
//! ```
//!
//! Keys are matched case-insensitively and stored lowercased. GitHub
//! writes `_No response_` for optional fields left blank; it is read as
//! an empty value.

use std::fmt;

use crate::error::{IndexError, IndexResult};

pub const PACKAGE_NAME: &str = "package name";
pub const VERSION: &str = "version";
pub const AUTHOR: &str = "author";
pub const SHORT_DESCRIPTION: &str = "short description";
pub const LONG_DESCRIPTION: &str = "long description";
pub const HOMEPAGE: &str = "homepage";
pub const LINK: &str = "link";
pub const NEW_VERSION: &str = "new version";
pub const NEW_VERSION_LINK: &str = "link for the new version";

/// Keys required by `register`.
pub const REGISTER_KEYS: [&str; 7] = [
    PACKAGE_NAME,
    VERSION,
    AUTHOR,
    SHORT_DESCRIPTION,
    LONG_DESCRIPTION,
    HOMEPAGE,
    LINK,
];

/// Keys required by `update`.
pub const UPDATE_KEYS: [&str; 3] = [PACKAGE_NAME, NEW_VERSION, NEW_VERSION_LINK];

/// Keys required by `delete`.
pub const DELETE_KEYS: [&str; 1] = [PACKAGE_NAME];

const NO_RESPONSE: &str = "_No response_";
const HEADING: &str = "### ";

/// Named arguments in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexArgs {
    values: Vec<(String, String)>,
}

impl IndexArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value in place.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        let key = key.trim().to_lowercase();
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The value of `key`, which must be present and not blank.
    pub fn require(&self, key: &str) -> IndexResult<&str> {
        let value = self.get(key).ok_or_else(|| IndexError::MissingArgument {
            name: key.to_string(),
        })?;
        if value.trim().is_empty() {
            return Err(IndexError::EmptyArgument {
                name: key.to_string(),
            });
        }
        Ok(value)
    }

    /// Check every key of `keys`, in order.
    pub fn check(&self, keys: &[&str]) -> IndexResult<()> {
        keys.iter().try_for_each(|key| self.require(key).map(|_| ()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build from `key=value` strings. Only the first `=` splits.
    pub fn from_pairs<I, S>(pairs: I) -> IndexResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = Self::new();
        for pair in pairs {
            let raw = pair.as_ref();
            let (key, value) = raw.split_once('=').ok_or_else(|| IndexError::MalformedArgument {
                raw: raw.to_string(),
            })?;
            args.set(key, value);
        }
        Ok(args)
    }

    /// Parse an issue-form body. Text before the first heading is ignored.
    pub fn from_issue_body(body: &str) -> Self {
        let mut args = Self::new();
        let mut current: Option<(&str, Vec<&str>)> = None;
        for line in body.lines() {
            if let Some(label) = line.strip_prefix(HEADING) {
                if let Some((key, lines)) = current.take() {
                    args.set(key, issue_value(&lines));
                }
                current = Some((label, Vec::new()));
            } else if let Some((_, lines)) = current.as_mut() {
                lines.push(line);
            }
        }
        if let Some((key, lines)) = current {
            args.set(key, issue_value(&lines));
        }
        args
    }
}

fn issue_value(lines: &[&str]) -> String {
    let value = lines.join("\n");
    let value = value.trim();
    if value == NO_RESPONSE {
        String::new()
    } else {
        value.to_string()
    }
}

/// The argument dump shown before an operation runs.
impl fmt::Display for IndexArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n--- Arguments detected from issue ---\n")?;
        for (key, value) in self.iter() {
            writeln!(f, "\t{key} : {value}")?;
        }
        writeln!(f)
    }
}
