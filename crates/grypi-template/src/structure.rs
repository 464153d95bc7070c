//! # Template Structure
//!
//! Required files and directories of a package template, checked in a
//! fixed order so the first missing item is always the one reported.

use std::path::{Path, PathBuf};

use crate::error::{TemplateError, TemplateResult};

/// Accepted requirements manifests, in order of preference.
pub const REQUIREMENTS_CANDIDATES: [&str; 2] = ["requirements.txt", "requirements.in"];

/// How much of the template tree is mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationProfile {
    /// Manifest, `setup.py`, `metadata.json`, `README.md`, and a nested
    /// `template/` directory.
    #[default]
    Standard,
    /// Everything in `Standard`, plus `template/requirements.txt` and
    /// `template/README.md` inside the nested directory.
    Strict,
}

fn require_file(path: PathBuf) -> TemplateResult<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(TemplateError::MissingFile { path })
    }
}

fn require_dir(path: PathBuf) -> TemplateResult<PathBuf> {
    if path.is_dir() {
        Ok(path)
    } else {
        Err(TemplateError::MissingDirectory { path })
    }
}

/// Locate the requirements manifest; the first existing candidate wins.
pub fn find_requirements(root: &Path) -> TemplateResult<PathBuf> {
    let candidates: Vec<PathBuf> = REQUIREMENTS_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .collect();
    match candidates.iter().find(|p| p.is_file()) {
        Some(found) => Ok(found.clone()),
        None => Err(TemplateError::MissingRequirements { candidates }),
    }
}

/// Paths confirmed present by [`check_structure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFiles {
    pub requirements: PathBuf,
    pub descriptor: PathBuf,
    pub metadata: PathBuf,
    pub readme: PathBuf,
    pub nested: PathBuf,
}

/// Assert that every mandatory file and directory exists under `root`.
pub fn check_structure(root: &Path, profile: ValidationProfile) -> TemplateResult<TemplateFiles> {
    let requirements = find_requirements(root)?;
    let descriptor = require_file(root.join("setup.py"))?;
    let metadata = require_file(root.join("metadata.json"))?;
    let readme = require_file(root.join("README.md"))?;
    let nested = require_dir(root.join("template"))?;

    if profile == ValidationProfile::Strict {
        require_file(nested.join("requirements.txt"))?;
        require_file(nested.join("README.md"))?;
    }

    tracing::debug!(root = %root.display(), ?profile, "template structure present");

    Ok(TemplateFiles {
        requirements,
        descriptor,
        metadata,
        readme,
        nested,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scaffold(root: &Path) {
        fs::write(root.join("requirements.txt"), "").unwrap();
        fs::write(root.join("setup.py"), "").unwrap();
        fs::write(root.join("metadata.json"), "{}").unwrap();
        fs::write(root.join("README.md"), "").unwrap();
        fs::create_dir(root.join("template")).unwrap();
    }

    #[test]
    fn complete_tree_passes_standard() {
        let dir = tempfile::tempdir().unwrap();
        scaffold(dir.path());
        let files = check_structure(dir.path(), ValidationProfile::Standard).unwrap();
        assert_eq!(files.requirements, dir.path().join("requirements.txt"));
    }

    #[test]
    fn alternate_manifest_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        scaffold(dir.path());
        fs::remove_file(dir.path().join("requirements.txt")).unwrap();
        fs::write(dir.path().join("requirements.in"), "").unwrap();
        let files = check_structure(dir.path(), ValidationProfile::Standard).unwrap();
        assert_eq!(files.requirements, dir.path().join("requirements.in"));
    }

    #[test]
    fn first_candidate_wins_when_both_exist() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("requirements.txt"), "").unwrap();
        fs::write(dir.path().join("requirements.in"), "").unwrap();
        assert_eq!(
            find_requirements(dir.path()).unwrap(),
            dir.path().join("requirements.txt")
        );
    }

    #[test]
    fn missing_manifest_reported_first() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_structure(dir.path(), ValidationProfile::Standard).unwrap_err();
        assert!(matches!(err, TemplateError::MissingRequirements { .. }));
    }

    #[test]
    fn missing_nested_dir_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        scaffold(dir.path());
        fs::remove_dir(dir.path().join("template")).unwrap();
        match check_structure(dir.path(), ValidationProfile::Standard) {
            Err(TemplateError::MissingDirectory { path }) => {
                assert_eq!(path, dir.path().join("template"))
            }
            other => panic!("expected MissingDirectory, got {other:?}"),
        }
    }

    #[test]
    fn readme_checked_before_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("requirements.txt"), "").unwrap();
        fs::write(dir.path().join("setup.py"), "").unwrap();
        fs::write(dir.path().join("metadata.json"), "{}").unwrap();
        match check_structure(dir.path(), ValidationProfile::Standard) {
            Err(TemplateError::MissingFile { path }) => {
                assert_eq!(path, dir.path().join("README.md"))
            }
            other => panic!("expected MissingFile, got {other:?}"),
        }
    }

    #[test]
    fn strict_requires_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        scaffold(dir.path());
        let err = check_structure(dir.path(), ValidationProfile::Strict).unwrap_err();
        match err {
            TemplateError::MissingFile { path } => {
                assert_eq!(path, dir.path().join("template").join("requirements.txt"))
            }
            other => panic!("expected MissingFile, got {other:?}"),
        }

        fs::write(dir.path().join("template/requirements.txt"), "").unwrap();
        fs::write(dir.path().join("template/README.md"), "").unwrap();
        assert!(check_structure(dir.path(), ValidationProfile::Strict).is_ok());
    }
}
