//! # Build Descriptor
//!
//! Reads the `name` and `version` keyword arguments from a template's
//! `setup.py`.
//!
//! [`BuildDescriptor::parse`] scans the source as Python tokens: comments
//! and string literals are skipped, a keyword is only recognised as a
//! standalone identifier followed by `=`, and its value must be a string
//! literal (adjacent literals are concatenated, escapes are decoded).
//! A value computed at runtime, such as `version=__version__`, is an
//! error rather than a silently wrong extraction.
//!
//! [`extract_naive`] is the older split-on-`key=`-then-`,` extraction. It
//! is kept for comparison with descriptors produced by earlier templates.

use std::path::Path;

use crate::error::{TemplateError, TemplateResult};

/// The declared package identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDescriptor {
    pub name: String,
    pub version: String,
}

impl BuildDescriptor {
    /// Read and parse a descriptor file.
    pub fn load(path: &Path) -> TemplateResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source).map_err(|(field, reason)| TemplateError::Descriptor {
            path: path.to_path_buf(),
            field,
            reason,
        })
    }

    /// Parse descriptor source text.
    pub fn parse(source: &str) -> Result<Self, (&'static str, String)> {
        let name = keyword_literal(source, "name").map_err(|r| ("name", r))?;
        let version = keyword_literal(source, "version").map_err(|r| ("version", r))?;
        Ok(Self { name, version })
    }
}

/// Split-based extraction: the text after the first `key=` up to the next
/// comma, trimmed, with surrounding quote characters stripped.
///
/// Any occurrence of `key=` counts, including inside another identifier
/// (`display_name=`), and a comma inside the value truncates it.
pub fn extract_naive(source: &str, key: &str) -> Option<String> {
    let marker = format!("{key}=");
    let start = source.find(&marker)? + marker.len();
    let rest = &source[start..];
    let value = rest.split(',').next().unwrap_or(rest);
    Some(value.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || (c == '\\' && self.peek_at(1) == Some('\n')) {
                self.pos += 1;
            } else if c == '#' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    /// Length of a string-literal prefix (`r`, `u`, `b`, `f`, combinations)
    /// immediately followed by a quote, if one starts here.
    fn literal_prefix_len(&self) -> Option<usize> {
        let mut len = 0;
        while len < 2 {
            match self.peek_at(len) {
                Some(c) if "rRuUbBfF".contains(c) => len += 1,
                _ => break,
            }
        }
        matches!(self.peek_at(len), Some('"') | Some('\'')).then_some(len)
    }

    /// Read a string literal starting at the current position. F-strings
    /// are only accepted when the value is being skipped.
    fn read_literal(&mut self, allow_fstring: bool) -> Result<String, String> {
        let prefix_len = self.literal_prefix_len().ok_or("value is not a string literal")?;
        let prefix: String = self.chars[self.pos..self.pos + prefix_len]
            .iter()
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if prefix.contains('f') && !allow_fstring {
            return Err("f-strings are evaluated at build time".to_string());
        }
        let raw = prefix.contains('r');
        self.pos += prefix_len;

        let quote = self.peek().ok_or("unexpected end of input")?;
        let triple = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };

        let mut out = String::new();
        loop {
            let c = self.peek().ok_or("unterminated string literal")?;
            if c == quote {
                if !triple {
                    self.pos += 1;
                    return Ok(out);
                }
                if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
                    self.pos += 3;
                    return Ok(out);
                }
            }
            if c == '\n' && !triple {
                return Err("unterminated string literal".to_string());
            }
            if c == '\\' {
                let next = self.peek_at(1).ok_or("unterminated string literal")?;
                self.pos += 2;
                if raw {
                    out.push('\\');
                    out.push(next);
                    continue;
                }
                match next {
                    '\n' => {}
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '0' => out.push('\0'),
                    '\\' | '\'' | '"' => out.push(next),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
                continue;
            }
            out.push(c);
            self.pos += 1;
        }
    }

    /// Skip a literal without decoding it.
    fn skip_literal(&mut self) -> Result<(), String> {
        self.read_literal(true).map(|_| ())
    }

    fn read_identifier(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.chars[start..self.pos].iter().collect()
    }
}

/// Find the first `keyword = <string literal>` and return the decoded value.
fn keyword_literal(source: &str, keyword: &str) -> Result<String, String> {
    let mut sc = Scanner::new(source);
    loop {
        sc.skip_whitespace();
        let Some(c) = sc.peek() else {
            return Err("keyword argument not found".to_string());
        };

        if sc.literal_prefix_len().is_some() {
            sc.skip_literal()?;
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let ident = sc.read_identifier();
            if ident != keyword {
                continue;
            }
            sc.skip_whitespace();
            if sc.peek() != Some('=') || sc.peek_at(1) == Some('=') {
                continue;
            }
            sc.pos += 1;
            sc.skip_whitespace();

            let mut value = sc.read_literal(false)?;
            loop {
                sc.skip_whitespace();
                if sc.literal_prefix_len().is_none() {
                    break;
                }
                value.push_str(&sc.read_literal(false)?);
            }
            return match sc.peek() {
                None | Some(',') | Some(')') => Ok(value),
                Some(other) => Err(format!(
                    "value is an expression, not a plain string literal (found {other:?} after the literal)"
                )),
            };
        }

        sc.pos += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETUP: &str = r#"
from setuptools import setup, find_packages

# name="commented-out"
setup(
    name="acme-tool",
    version='1.2.3',
    description="Tools, widgets, and more",
    packages=find_packages(),
)
"#;

    #[test]
    fn parses_quoted_keywords() {
        let d = BuildDescriptor::parse(SETUP).unwrap();
        assert_eq!(d.name, "acme-tool");
        assert_eq!(d.version, "1.2.3");
    }

    #[test]
    fn comments_and_strings_are_skipped() {
        let src = r#"
long_description = "use name='wrong' here"
setup(name = "right", version = "0.1.0")
"#;
        let d = BuildDescriptor::parse(src).unwrap();
        assert_eq!(d.name, "right");
    }

    #[test]
    fn identifiers_ending_in_keyword_do_not_match() {
        let src = r#"setup(display_name="Display", name="pkg", version="1.0.0")"#;
        let d = BuildDescriptor::parse(src).unwrap();
        assert_eq!(d.name, "pkg");
        assert_eq!(extract_naive(src, "name").as_deref(), Some("Display"));
    }

    #[test]
    fn commas_inside_literals_are_preserved() {
        let src = r#"setup(name="a,b", version="1.0.0")"#;
        assert_eq!(BuildDescriptor::parse(src).unwrap().name, "a,b");
        assert_eq!(extract_naive(src, "name").as_deref(), Some("a"));
    }

    #[test]
    fn adjacent_literals_concatenate() {
        let src = "setup(name='acme' '-tool', version=\"1.0.0\")";
        assert_eq!(BuildDescriptor::parse(src).unwrap().name, "acme-tool");
    }

    #[test]
    fn comparison_is_not_an_assignment() {
        let src = r#"if name == "x": pass
setup(name="real", version="2.0.0")"#;
        assert_eq!(BuildDescriptor::parse(src).unwrap().name, "real");
    }

    #[test]
    fn computed_version_is_an_error() {
        let src = r#"setup(name="pkg", version=__version__)"#;
        let (field, reason) = BuildDescriptor::parse(src).unwrap_err();
        assert_eq!(field, "version");
        assert!(reason.contains("not a string literal"));
    }

    #[test]
    fn expression_after_literal_is_an_error() {
        let src = r#"setup(name="pkg" + SUFFIX, version="1.0.0")"#;
        let (field, _) = BuildDescriptor::parse(src).unwrap_err();
        assert_eq!(field, "name");
    }

    #[test]
    fn missing_keyword_is_an_error() {
        let (field, reason) = BuildDescriptor::parse("setup(name='x')").unwrap_err();
        assert_eq!(field, "version");
        assert!(reason.contains("not found"));
    }

    #[test]
    fn fstrings_elsewhere_are_skipped() {
        let src = r#"setup(long_description=f"{readme}", name="pkg", version="1.0.0")"#;
        assert_eq!(BuildDescriptor::parse(src).unwrap().name, "pkg");
        let (field, _) = BuildDescriptor::parse(r#"setup(name=f"pkg", version="1.0.0")"#).unwrap_err();
        assert_eq!(field, "name");
    }

    #[test]
    fn escapes_are_decoded() {
        let src = r#"setup(name="it\'s", version="1.0.0")"#;
        assert_eq!(BuildDescriptor::parse(src).unwrap().name, "it's");
    }

    #[test]
    fn naive_extraction_strips_quotes_and_whitespace() {
        assert_eq!(extract_naive(SETUP, "version").as_deref(), Some("1.2.3"));
        assert_eq!(extract_naive("setup(version= \"9.9.9\" )", "version").as_deref(), Some("9.9.9\" )"));
        assert_eq!(extract_naive("nothing here", "name"), None);
    }

    #[test]
    fn load_wraps_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.py");
        std::fs::write(&path, "setup()").unwrap();
        match BuildDescriptor::load(&path) {
            Err(TemplateError::Descriptor { path: p, field, .. }) => {
                assert_eq!(p, path);
                assert_eq!(field, "name");
            }
            other => panic!("expected Descriptor error, got {other:?}"),
        }
    }
}
