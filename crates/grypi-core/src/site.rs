//! # Site Layout
//!
//! Where the template under release and the static index live on disk.
//!
//! ```text
//! template/                  the package template being released
//!   metadata.json
//!   setup.py
//! grypi/                     the static simple index
//!   index.html
//!   pkg_template.html
//!   <normalized-name>/
//!     index.html
//!     metadata.json
//! ```

use std::path::{Path, PathBuf};

/// Default template directory, relative to the working directory.
pub const DEFAULT_TEMPLATE_DIR: &str = "template";

/// Default index root, relative to the working directory.
pub const DEFAULT_INDEX_ROOT: &str = "grypi";

/// Filesystem layout for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    pub template_dir: PathBuf,
    pub index_root: PathBuf,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            index_root: PathBuf::from(DEFAULT_INDEX_ROOT),
        }
    }
}

impl SiteLayout {
    pub fn new(template_dir: impl Into<PathBuf>, index_root: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            index_root: index_root.into(),
        }
    }

    /// Re-root both directories under `base`. Absolute paths are kept.
    pub fn rooted_at(&self, base: &Path) -> Self {
        Self {
            template_dir: base.join(&self.template_dir),
            index_root: base.join(&self.index_root),
        }
    }

    /// The template's `metadata.json`.
    pub fn template_metadata(&self) -> PathBuf {
        self.template_dir.join("metadata.json")
    }

    /// The template's build descriptor.
    pub fn build_descriptor(&self) -> PathBuf {
        self.template_dir.join("setup.py")
    }

    /// The top-level simple index.
    pub fn index_file(&self) -> PathBuf {
        self.index_root.join("index.html")
    }

    /// The page template used when a package is first registered.
    pub fn page_template(&self) -> PathBuf {
        self.index_root.join("pkg_template.html")
    }

    /// Directory holding one package's page and ledger.
    pub fn package_dir(&self, dir_name: &str) -> PathBuf {
        self.index_root.join(dir_name)
    }

    /// One package's version page.
    pub fn package_page(&self, dir_name: &str) -> PathBuf {
        self.package_dir(dir_name).join("index.html")
    }

    /// One package's metadata ledger.
    pub fn package_ledger(&self, dir_name: &str) -> PathBuf {
        self.package_dir(dir_name).join("metadata.json")
    }
}
