//! # Package Pages
//!
//! Each package has `<index root>/<normalized-name>/index.html`, listing
//! one anchor per published version. A version anchor points at the
//! source link with an `#egg=<normalized-name>-<version>` fragment.
//!
//! The page is created from `pkg_template.html` by plain placeholder
//! substitution, and afterwards edited through the document model: new
//! versions are copies of the last anchor, and the "latest version" is
//! the second `span` inside the first `section` of the first `div` of
//! the `body`.

use std::path::{Path, PathBuf};

use crate::error::{IndexError, IndexResult, MarkupError};
use crate::index::{append_anchor_copy, load_document, write_text};
use crate::markup::{Document, Node, NodePath};

/// Placeholders of the page template, in substitution order.
pub const PLACEHOLDERS: [&str; 6] = [
    "_package_name",
    "_version",
    "_link",
    "_homepage",
    "_author",
    "_long_description",
];

const LATEST_VERSION_SPAN: usize = 1;

/// Install link of one version.
pub fn egg_link(link: &str, normalized_name: &str, version: &str) -> String {
    format!("{link}#egg={normalized_name}-{version}")
}

/// Values substituted into the page template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFields<'a> {
    pub package_name: &'a str,
    pub version: &'a str,
    /// Complete install link, fragment included.
    pub link: &'a str,
    pub homepage: &'a str,
    pub author: &'a str,
    pub long_description: &'a str,
}

impl PageFields<'_> {
    fn values(&self) -> [&str; 6] {
        [
            self.package_name,
            self.version,
            self.link,
            self.homepage,
            self.author,
            self.long_description,
        ]
    }
}

/// A parsed package page.
#[derive(Debug, Clone)]
pub struct PackagePage {
    document: Document,
    path: PathBuf,
}

impl PackagePage {
    /// Fill the page template. Substitution is sequential, so a value
    /// containing a later placeholder is substituted again.
    pub fn render(template: &str, fields: &PageFields<'_>) -> String {
        PLACEHOLDERS
            .iter()
            .zip(fields.values())
            .fold(template.to_string(), |page, (placeholder, value)| {
                page.replace(placeholder, value)
            })
    }

    pub fn parse(source: &str, path: impl Into<PathBuf>) -> Result<Self, MarkupError> {
        Ok(Self {
            document: Document::parse(source)?,
            path: path.into(),
        })
    }

    pub fn load(path: &Path) -> IndexResult<Self> {
        Ok(Self {
            document: load_document(path)?,
            path: path.to_path_buf(),
        })
    }

    /// Write the page back to where it was read from.
    pub fn save(&self) -> IndexResult<()> {
        write_text(&self.path, &self.to_html())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn to_html(&self) -> String {
        self.document.to_html()
    }

    fn shape_error(&self, reason: impl Into<String>) -> IndexError {
        IndexError::PageShape {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    /// Hrefs of every version anchor, oldest first.
    pub fn version_links(&self) -> Vec<String> {
        self.document
            .find_all("a")
            .iter()
            .filter_map(|path| self.document.element(path)?.attr("href").map(String::from))
            .collect()
    }

    /// Add a version anchor pointing at `href` after the last one.
    pub fn append_version(&mut self, href: &str) -> IndexResult<()> {
        let last = self
            .document
            .find_all("a")
            .pop()
            .ok_or_else(|| self.shape_error("no version anchor to copy"))?;
        append_anchor_copy(&mut self.document, &last, |anchor| {
            anchor.set_attr("href", href);
            Ok(())
        })
    }

    fn latest_version_path(&self) -> Option<NodePath> {
        let body = self.document.find_first_in(&[], "body")?;
        let div = self.document.find_first_in(&body, "div")?;
        let section = self.document.find_first_in(&div, "section")?;
        self.document
            .find_all_in(&section, "span")
            .into_iter()
            .nth(LATEST_VERSION_SPAN)
    }

    pub fn latest_version(&self) -> Option<String> {
        let path = self.latest_version_path()?;
        let span = self.document.element(&path)?;
        span.first_child_text().map(|t| t.trim().to_string())
    }

    /// Replace the first child of the latest-version span with `version`.
    pub fn set_latest_version(&mut self, version: &str) -> IndexResult<()> {
        let path = self
            .latest_version_path()
            .ok_or_else(|| self.shape_error("no latest-version span under body > div > section"))?;
        match self.document.element_mut(&path) {
            Some(span) => {
                span.replace_first_child(Node::text(version));
                Ok(())
            }
            None => Err(self.shape_error("latest-version span vanished")),
        }
    }
}
