//! # Release Gate
//!
//! Runs on every pushed tag. On top of the template checks it requires:
//!
//! - the `name` declared in `setup.py` equals the repository name;
//! - the `version` declared in `setup.py` equals the tag;
//! - both the declared version and the tag are semantic versions.
//!
//! When one of those three comparisons fails and the tag *is* a valid
//! semantic version, the tag was most likely pushed by mistake. The gate
//! then deletes it locally and on `origin` (best effort, exit codes are
//! logged and otherwise ignored) before returning the original error. A
//! tag that is not a semantic version is left alone.

use std::fmt;
use std::path::Path;

use grypi_core::{is_semver, GithubContext, Version};

use crate::descriptor::BuildDescriptor;
use crate::error::{TemplateError, TemplateResult};
use crate::probe::DependencyProbe;
use crate::runner::CommandRunner;
use crate::validate::{TemplateValidator, ValidatedTemplate};

/// Remote the rejected tag is deleted from.
pub const DEFAULT_REMOTE: &str = "origin";

/// Compare the declared identity with the repository and the tag.
pub fn compare_release(
    descriptor: &BuildDescriptor,
    repository: &str,
    tag: &str,
) -> TemplateResult<Version> {
    if descriptor.name != repository {
        return Err(TemplateError::NameMismatch {
            declared: descriptor.name.clone(),
            repository: repository.to_string(),
        });
    }
    if descriptor.version != tag {
        return Err(TemplateError::VersionMismatch {
            declared: descriptor.version.clone(),
            tag: tag.to_string(),
        });
    }

    let mut malformed = Vec::new();
    if !is_semver(&descriptor.version) {
        malformed.push(format!("setup.py version {:?}", descriptor.version));
    }
    if !is_semver(tag) {
        malformed.push(format!("tag {tag:?}"));
    }
    if !malformed.is_empty() {
        return Err(TemplateError::MalformedVersions { values: malformed });
    }

    Ok(Version::parse(tag)?)
}

/// One attempted cleanup command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupStep {
    pub command: String,
    /// Exit code, when the command ran.
    pub status: Option<i32>,
    /// Why the command could not be started, when it did not run.
    pub spawn_error: Option<String>,
}

impl CleanupStep {
    pub fn succeeded(&self) -> bool {
        self.status == Some(0)
    }

    fn outcome(&self) -> String {
        match (&self.spawn_error, self.status) {
            (Some(error), _) => format!("could not start: {error}"),
            (None, Some(0)) => "ok".to_string(),
            (None, Some(code)) => format!("failed with exit code {code}"),
            (None, None) => "terminated by a signal".to_string(),
        }
    }
}

/// Record of a best-effort tag deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCleanup {
    pub tag: String,
    pub remote: String,
    pub steps: Vec<CleanupStep>,
}

impl TagCleanup {
    /// Whether every cleanup command ran and exited zero.
    pub fn completed(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(CleanupStep::succeeded)
    }

    /// What happened to the tag, with manual instructions when the
    /// automatic deletion did not complete.
    pub fn manual_hint(&self) -> String {
        if self.completed() {
            return format!(
                "Tag {tag} was deleted locally and on {remote} because it does not match \
                 the package declaration.",
                tag = self.tag,
                remote = self.remote,
            );
        }
        let mut hint = format!(
            "Tag {tag} does not match the package declaration and was not fully deleted.\n",
            tag = self.tag,
        );
        for step in &self.steps {
            hint.push_str(&format!("  {}: {}\n", step.command, step.outcome()));
        }
        hint.push_str(&format!(
            "Remove it manually:\n  git tag -d {tag}\n  git push --delete {remote} {tag}",
            tag = self.tag,
            remote = self.remote,
        ));
        hint
    }
}

/// A gate failure, with the cleanup that was attempted because of it.
#[derive(Debug)]
pub struct GateRejection {
    pub error: TemplateError,
    pub cleanup: Option<TagCleanup>,
}

impl fmt::Display for GateRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for GateRejection {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}

impl From<TemplateError> for GateRejection {
    fn from(error: TemplateError) -> Self {
        Self {
            error,
            cleanup: None,
        }
    }
}

impl From<grypi_core::GrypiError> for GateRejection {
    fn from(error: grypi_core::GrypiError) -> Self {
        TemplateError::from(error).into()
    }
}

/// Everything the gate established about an accepted release.
#[derive(Debug, Clone)]
pub struct ReleaseCheck {
    pub template: ValidatedTemplate,
    pub descriptor: BuildDescriptor,
    pub version: Version,
}

/// Release gate over one template directory.
pub struct ReleaseGate<R> {
    validator: TemplateValidator,
    runner: R,
    delete_rejected_tags: bool,
    remote: String,
    dependency_index: Option<String>,
}

impl<R: CommandRunner> ReleaseGate<R> {
    pub fn new(validator: TemplateValidator, runner: R) -> Self {
        Self {
            validator,
            runner,
            delete_rejected_tags: true,
            remote: DEFAULT_REMOTE.to_string(),
            dependency_index: None,
        }
    }

    /// Disable or enable deletion of mistaken tags.
    pub fn delete_rejected_tags(mut self, enabled: bool) -> Self {
        self.delete_rejected_tags = enabled;
        self
    }

    /// Remote to delete rejected tags from.
    pub fn remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Require every declared dependency to be available on `index_url`.
    pub fn dependency_index(mut self, index_url: Option<String>) -> Self {
        self.dependency_index = index_url;
        self
    }

    /// Validate `template_dir` against the repository and tag in `ctx`.
    pub fn check(
        &self,
        template_dir: &Path,
        ctx: &GithubContext,
    ) -> Result<ReleaseCheck, GateRejection> {
        let template = self.validator.validate(template_dir)?;
        let descriptor = BuildDescriptor::load(&template.files.descriptor)?;
        let repository = ctx.repo_name()?;
        let tag = ctx.tag()?;

        tracing::debug!(
            declared_name = %descriptor.name,
            declared_version = %descriptor.version,
            repository,
            tag,
            "comparing declaration with release context"
        );

        let version = match compare_release(&descriptor, repository, tag) {
            Ok(version) => version,
            Err(error) => {
                let cleanup = (self.delete_rejected_tags && is_semver(tag))
                    .then(|| self.delete_tag(tag));
                return Err(GateRejection { error, cleanup });
            }
        };

        if let Some(index_url) = &self.dependency_index {
            let probe = DependencyProbe::new(&self.runner, index_url.clone());
            probe.check_all(&template.metadata.dependency_names())?;
        }

        tracing::info!(package = %descriptor.name, version = %version, "release accepted");

        Ok(ReleaseCheck {
            template,
            descriptor,
            version,
        })
    }

    /// Delete `tag` locally and on the configured remote.
    pub fn delete_tag(&self, tag: &str) -> TagCleanup {
        tracing::warn!(tag, remote = %self.remote, "deleting mistaken release tag");
        let commands: [Vec<&str>; 2] = [
            vec!["tag", "-d", tag],
            vec!["push", "--delete", self.remote.as_str(), tag],
        ];
        let steps = commands
            .iter()
            .map(|args| {
                let command = format!("git {}", args.join(" "));
                match self.runner.run("git", args) {
                    Ok(output) => {
                        if !output.success() {
                            tracing::warn!(%command, status = ?output.status, "tag cleanup command failed");
                        }
                        CleanupStep {
                            command,
                            status: output.status,
                            spawn_error: None,
                        }
                    }
                    Err(e) => {
                        tracing::warn!(%command, error = %e, "tag cleanup command could not start");
                        CleanupStep {
                            command,
                            status: None,
                            spawn_error: Some(e.to_string()),
                        }
                    }
                }
            })
            .collect();
        TagCleanup {
            tag: tag.to_string(),
            remote: self.remote.clone(),
            steps,
        }
    }
}
