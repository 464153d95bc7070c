//! # Package Index
//!
//! The top-level simple index: one anchor per registered package, in
//! registration order. A package anchor looks like
//!
//! ```html
//! <a href="my-pkg/">My_Pkg<span> </span><span>1.2.3</span><span>Short description</span></a>
//! ```
//!
//! The href is the normalized name followed by `/`, the first child is
//! the display name, and the second and third `span` descendants hold
//! the latest version and the short description. New anchors are copied
//! from the last existing one, so the index page decides the markup.

use std::path::Path;

use serde::Serialize;

use grypi_core::PackageName;

use crate::error::{IndexError, IndexResult, MarkupError};
use crate::markup::{Document, Element, Node, NodePath};

const VERSION_SPAN: usize = 1;
const DESCRIPTION_SPAN: usize = 2;

pub(crate) fn read_text(path: &Path) -> IndexResult<String> {
    std::fs::read_to_string(path).map_err(|source| IndexError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_text(path: &Path, text: &str) -> IndexResult<()> {
    std::fs::write(path, text).map_err(|source| IndexError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn load_document(path: &Path) -> IndexResult<Document> {
    let text = read_text(path)?;
    Document::parse(&text).map_err(|source| IndexError::Markup {
        path: path.to_path_buf(),
        source,
    })
}

/// Set the text of the `index`-th `span` below `anchor`.
pub(crate) fn set_span_text(anchor: &mut Element, index: usize, value: &str) -> IndexResult<()> {
    let href = anchor.attr("href").unwrap_or_default().to_string();
    let spans = anchor.find_all("span");
    let found = spans.len();
    let span = spans
        .get(index)
        .and_then(|path| anchor.element_at_mut(path))
        .ok_or_else(|| IndexError::AnchorShape {
            href,
            reason: format!("expected at least {} span elements, found {found}", index + 1),
        })?;
    span.set_text(value);
    Ok(())
}

/// Copy of the anchor at `last`, adjusted by `edit`, inserted right after
/// it. The whitespace preceding `last` is repeated before the copy.
pub(crate) fn append_anchor_copy(
    document: &mut Document,
    last: &NodePath,
    edit: impl FnOnce(&mut Element) -> IndexResult<()>,
) -> IndexResult<()> {
    let mut anchor = document
        .element(last)
        .cloned()
        .ok_or_else(|| IndexError::AnchorShape {
            href: String::new(),
            reason: "no element at the copied position".to_string(),
        })?;
    edit(&mut anchor)?;
    let mut nodes = Vec::with_capacity(2);
    if let Some(indent) = document.leading_whitespace(last) {
        nodes.push(Node::Text(indent.to_string()));
    }
    nodes.push(Node::Element(anchor));
    document.insert_after(last, nodes);
    Ok(())
}

/// One package listed in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageEntry {
    pub href: String,
    pub name: String,
    pub version: String,
    pub description: String,
}

/// The parsed top-level index page.
#[derive(Debug, Clone)]
pub struct PackageIndex {
    document: Document,
}

impl PackageIndex {
    pub fn parse(source: &str) -> Result<Self, MarkupError> {
        Ok(Self {
            document: Document::parse(source)?,
        })
    }

    pub fn load(path: &Path) -> IndexResult<Self> {
        Ok(Self {
            document: load_document(path)?,
        })
    }

    pub fn save(&self, path: &Path) -> IndexResult<()> {
        write_text(path, &self.to_html())
    }

    pub fn to_html(&self) -> String {
        self.document.to_html()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn anchor_path(&self, name: &PackageName) -> Option<NodePath> {
        let href = name.index_href();
        self.document.find_all("a").into_iter().find(|path| {
            self.document
                .element(path)
                .and_then(|a| a.attr("href"))
                .is_some_and(|h| h == href)
        })
    }

    fn entry_at(&self, path: &[usize]) -> Option<PackageEntry> {
        let anchor = self.document.element(path)?;
        let spans = anchor.find_all("span");
        let span_text = |index: usize| {
            spans
                .get(index)
                .and_then(|p| anchor.element_at(p))
                .map(|span| span.text().trim().to_string())
                .unwrap_or_default()
        };
        Some(PackageEntry {
            href: anchor.attr("href")?.to_string(),
            name: anchor
                .first_child_text()
                .map(|t| t.trim().to_string())
                .unwrap_or_default(),
            version: span_text(VERSION_SPAN),
            description: span_text(DESCRIPTION_SPAN),
        })
    }

    /// Whether an anchor already points at `name`'s normalized href.
    pub fn contains(&self, name: &PackageName) -> bool {
        self.anchor_path(name).is_some()
    }

    /// Every package anchor (href ending in `/`), in document order.
    pub fn entries(&self) -> Vec<PackageEntry> {
        self.document
            .find_all("a")
            .iter()
            .filter_map(|path| self.entry_at(path))
            .filter(|entry| entry.href.ends_with('/'))
            .collect()
    }

    pub fn entry(&self, name: &PackageName) -> Option<PackageEntry> {
        self.anchor_path(name).and_then(|path| self.entry_at(&path))
    }

    /// Add an anchor for `name` after the last anchor of the page.
    pub fn append(
        &mut self,
        name: &PackageName,
        version: &str,
        description: &str,
    ) -> IndexResult<PackageEntry> {
        if self.contains(name) {
            return Err(IndexError::AlreadyRegistered {
                package: name.normalized().to_string(),
            });
        }
        let last = self
            .document
            .find_all("a")
            .pop()
            .ok_or_else(|| IndexError::AnchorShape {
                href: name.index_href(),
                reason: "the index has no anchor to copy".to_string(),
            })?;

        append_anchor_copy(&mut self.document, &last, |anchor| {
            anchor.set_attr("href", name.index_href());
            anchor.replace_first_child(Node::text(name.display_name()));
            set_span_text(anchor, VERSION_SPAN, version)?;
            set_span_text(anchor, DESCRIPTION_SPAN, description)
        })?;

        tracing::debug!(package = %name.normalized(), version, "appended index anchor");
        self.entry(name).ok_or_else(|| IndexError::NotRegistered {
            package: name.normalized().to_string(),
        })
    }

    /// Replace the version shown for `name`.
    pub fn set_version(&mut self, name: &PackageName, version: &str) -> IndexResult<()> {
        let path = self.anchor_path(name).ok_or_else(|| IndexError::NotRegistered {
            package: name.normalized().to_string(),
        })?;
        let anchor = self
            .document
            .element_mut(&path)
            .ok_or_else(|| IndexError::NotRegistered {
                package: name.normalized().to_string(),
            })?;
        set_span_text(anchor, VERSION_SPAN, version)
    }

    /// Remove `name`'s anchor and the whitespace before it.
    pub fn remove(&mut self, name: &PackageName) -> IndexResult<PackageEntry> {
        let not_registered = || IndexError::NotRegistered {
            package: name.normalized().to_string(),
        };
        let path = self.anchor_path(name).ok_or_else(not_registered)?;
        let entry = self.entry_at(&path).ok_or_else(not_registered)?;
        let indented = self.document.leading_whitespace(&path).is_some();
        self.document.remove(&path);
        if indented {
            let mut indent = path;
            if let Some(last) = indent.last_mut() {
                *last -= 1;
            }
            self.document.remove(&indent);
        }
        Ok(entry)
    }
}
