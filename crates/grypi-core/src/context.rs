//! # CI Context
//!
//! The workflow context exported by the CI runner as the `GITHUB_CONTEXT`
//! environment variable (`${{ toJson(github) }}`). Only two fields are
//! read: `repository` (`"<owner>/<name>"`) and `event.ref`
//! (`"refs/tags/<tag>"`). The trailing `/` segment of each gives the
//! package name and the release tag.

use serde::Deserialize;

use crate::error::{GrypiError, GrypiResult};

/// Environment variable holding the serialized workflow context.
pub const CONTEXT_ENV_VAR: &str = "GITHUB_CONTEXT";

/// The triggering event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GithubEvent {
    #[serde(rename = "ref")]
    pub git_ref: String,
}

/// The subset of the workflow context grypi consumes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GithubContext {
    pub repository: String,
    pub event: GithubEvent,
}

fn last_segment<'a>(field: &str, value: &'a str) -> GrypiResult<&'a str> {
    match value.rsplit('/').next() {
        Some(segment) if !segment.trim().is_empty() => Ok(segment),
        _ => Err(GrypiError::ContextField {
            field: field.to_string(),
            reason: format!("{value:?} has an empty trailing segment"),
        }),
    }
}

impl GithubContext {
    /// Parse a context from its JSON serialization, checking that the
    /// derived repository name and tag are non-empty.
    pub fn from_json(text: &str) -> GrypiResult<Self> {
        let ctx: Self =
            serde_json::from_str(text).map_err(|source| GrypiError::ContextParse { source })?;
        ctx.repo_name()?;
        ctx.tag()?;
        Ok(ctx)
    }

    /// Read the context from [`CONTEXT_ENV_VAR`].
    pub fn from_env() -> GrypiResult<Self> {
        let text = std::env::var(CONTEXT_ENV_VAR).map_err(|_| GrypiError::MissingContext {
            var: CONTEXT_ENV_VAR.to_string(),
        })?;
        Self::from_json(&text)
    }

    /// Build a context directly, e.g. from command-line flags.
    pub fn new(repository: impl Into<String>, git_ref: impl Into<String>) -> GrypiResult<Self> {
        let ctx = Self {
            repository: repository.into(),
            event: GithubEvent {
                git_ref: git_ref.into(),
            },
        };
        ctx.repo_name()?;
        ctx.tag()?;
        Ok(ctx)
    }

    /// Short repository name: the last `/` segment of `repository`.
    pub fn repo_name(&self) -> GrypiResult<&str> {
        last_segment("repository", &self.repository)
    }

    /// Pushed tag: the last `/` segment of `event.ref`.
    pub fn tag(&self) -> GrypiResult<&str> {
        last_segment("event.ref", &self.event.git_ref)
    }

    /// Repository web page.
    pub fn homepage(&self) -> String {
        format!("https://github.com/{}", self.repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: &str = r#"{
        "repository": "acme/acme-tool",
        "event": {"ref": "refs/tags/1.2.3", "created": true},
        "workflow": "release"
    }"#;

    #[test]
    fn parses_repository_and_tag() {
        let ctx = GithubContext::from_json(CONTEXT).unwrap();
        assert_eq!(ctx.repo_name().unwrap(), "acme-tool");
        assert_eq!(ctx.tag().unwrap(), "1.2.3");
        assert_eq!(ctx.homepage(), "https://github.com/acme/acme-tool");
    }

    #[test]
    fn missing_event_ref_is_a_parse_error() {
        let err = GithubContext::from_json(r#"{"repository": "acme/x", "event": {}}"#).unwrap_err();
        assert!(matches!(err, GrypiError::ContextParse { .. }));
    }

    #[test]
    fn trailing_slash_is_rejected() {
        let err = GithubContext::from_json(r#"{"repository": "acme/", "event": {"ref": "refs/tags/1.0.0"}}"#)
            .unwrap_err();
        match err {
            GrypiError::ContextField { field, .. } => assert_eq!(field, "repository"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bare_values_have_themselves_as_last_segment() {
        let ctx = GithubContext::new("acme-tool", "v0.1.0").unwrap();
        assert_eq!(ctx.repo_name().unwrap(), "acme-tool");
        assert_eq!(ctx.tag().unwrap(), "v0.1.0");
    }
}
