//! # Markup Document Model
//!
//! A small HTML tree sufficient for the static index pages: elements with
//! ordered attributes, text, comments and `<!...>`/`<?...>` declarations.
//!
//! ## Round-tripping
//!
//! Text and comments are stored exactly as they appear in the source and
//! written back unchanged, so an untouched document serializes to its
//! source byte for byte, except that:
//!
//! - attribute values are re-emitted double-quoted with `&` and `"`
//!   escaped;
//! - tag and attribute names are lowercased;
//! - end tags without a matching open element are dropped.
//!
//! Elements closed implicitly (by an outer end tag or end of input) are
//! written without an end tag, as they were read. `script` and `style`
//! content is raw text.
//!
//! Nodes are addressed by [`NodePath`], the child indices leading from
//! the document root to the node.

use crate::error::MarkupError;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Child indices from the document root to a node.
pub type NodePath = Vec<usize>;

/// Whether `name` is an element that never has content or an end tag.
pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Escape character data for use as element text.
pub fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Decode the character references that appear in hand-written pages.
/// Unknown references are left as they are.
pub fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(at) = rest.find('&') {
        out.push_str(&rest[..at]);
        let tail = &rest[at..];
        let decoded = tail
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// One attribute, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Decoded value; `None` for a bare boolean attribute.
    pub value: Option<String>,
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data as written in the source, references not decoded.
    Text(String),
    Comment(String),
    /// Declaration body including its leading `!` or `?`.
    Declaration(String),
}

impl Node {
    /// A text node holding `value`, escaped.
    pub fn text(value: &str) -> Self {
        Node::Text(escape_text(value))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Whether this is a text node holding only whitespace.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text(text) if text.chars().all(char::is_whitespace))
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_html(out),
            Node::Text(text) => out.push_str(text),
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Declaration(body) => {
                out.push('<');
                out.push_str(body);
                out.push('>');
            }
        }
    }
}

/// An element and its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    self_closing: bool,
    has_end_tag: bool,
}

impl Element {
    pub fn new(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        let has_end_tag = !is_void(&name);
        Self {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
            self_closing: false,
            has_end_tag,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .and_then(|a| a.value.as_deref())
    }

    /// Set an attribute, keeping its position when it already exists.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = Some(value.into());
        match self.attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attribute {
                name: name.to_ascii_lowercase(),
                value,
            }),
        }
    }

    /// Decoded text of the whole subtree.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        collect_text(&self.children, &mut raw);
        decode_entities(&raw)
    }

    /// Decoded text of the first child node, whatever its kind.
    pub fn first_child_text(&self) -> Option<String> {
        match self.children.first()? {
            Node::Text(text) => Some(decode_entities(text)),
            Node::Element(element) => Some(element.text()),
            _ => None,
        }
    }

    /// Replace every child with a single text node.
    pub fn set_text(&mut self, value: &str) {
        self.children = vec![Node::text(value)];
    }

    /// Replace the first child node, or add one to an empty element.
    pub fn replace_first_child(&mut self, node: Node) {
        match self.children.first_mut() {
            Some(first) => *first = node,
            None => self.children.push(node),
        }
    }

    /// Paths, relative to this element, of every descendant named `tag`,
    /// in document order.
    pub fn find_all(&self, tag: &str) -> Vec<NodePath> {
        let mut found = Vec::new();
        collect_elements(&self.children, &mut Vec::new(), tag, &mut found);
        found
    }

    pub fn element_at(&self, path: &[usize]) -> Option<&Element> {
        let mut element = self;
        for &index in path {
            element = element.children.get(index)?.as_element()?;
        }
        Some(element)
    }

    pub fn element_at_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut element = self;
        for &index in path {
            element = match element.children.get_mut(index)? {
                Node::Element(child) => child,
                _ => return None,
            };
        }
        Some(element)
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for attr in &self.attrs {
            out.push(' ');
            out.push_str(&attr.name);
            if let Some(value) = &attr.value {
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
        }
        out.push_str(if self.self_closing { "/>" } else { ">" });
        for child in &self.children {
            child.write_html(out);
        }
        if self.has_end_tag {
            out.push_str("</");
            out.push_str(&self.name);
            out.push('>');
        }
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
            _ => {}
        }
    }
}

fn collect_elements(nodes: &[Node], prefix: &mut NodePath, tag: &str, found: &mut Vec<NodePath>) {
    for (index, node) in nodes.iter().enumerate() {
        if let Node::Element(element) = node {
            prefix.push(index);
            if element.name == tag {
                found.push(prefix.clone());
            }
            collect_elements(&element.children, prefix, tag, found);
            prefix.pop();
        }
    }
}

/// A parsed markup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn parse(source: &str) -> Result<Self, MarkupError> {
        let mut tokenizer = Tokenizer::new(source);
        let mut open = vec![Element::new("")];

        while let Some(token) = tokenizer.next_token()? {
            let node = match token {
                Token::StartTag {
                    name,
                    attrs,
                    self_closing,
                } => {
                    let mut element = Element::new(&name);
                    element.attrs = attrs;
                    element.self_closing = self_closing;
                    if self_closing || is_void(&element.name) {
                        element.has_end_tag = false;
                        Node::Element(element)
                    } else {
                        open.push(element);
                        continue;
                    }
                }
                Token::EndTag(name) => {
                    // The synthetic root at index 0 never matches.
                    match open.iter().skip(1).rposition(|e| e.name == name) {
                        Some(index) => {
                            while open.len() > index + 2 {
                                close(&mut open, false);
                            }
                            close(&mut open, true);
                        }
                        None => tracing::debug!(tag = %name, "dropping unmatched end tag"),
                    }
                    continue;
                }
                Token::Text(text) => Node::Text(text),
                Token::Comment(comment) => Node::Comment(comment),
                Token::Declaration(body) => Node::Declaration(body),
            };
            if let Some(parent) = open.last_mut() {
                parent.children.push(node);
            }
        }

        while open.len() > 1 {
            close(&mut open, false);
        }
        let mut root = open.pop().unwrap_or_else(|| Element::new(""));
        root.has_end_tag = false;
        Ok(Self { root })
    }

    /// Top-level nodes.
    pub fn children(&self) -> &[Node] {
        &self.root.children
    }

    /// Element at `path`; the empty path is the document root.
    pub fn element(&self, path: &[usize]) -> Option<&Element> {
        self.root.element_at(path)
    }

    pub fn element_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        self.root.element_at_mut(path)
    }

    /// Every element named `tag`, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<NodePath> {
        self.find_all_in(&[], tag)
    }

    /// Every element named `tag` below the element at `at`, as absolute
    /// paths in document order.
    pub fn find_all_in(&self, at: &[usize], tag: &str) -> Vec<NodePath> {
        let Some(element) = self.element(at) else {
            return Vec::new();
        };
        element
            .find_all(tag)
            .into_iter()
            .map(|relative| at.iter().copied().chain(relative).collect())
            .collect()
    }

    /// First element named `tag` below the element at `at`.
    pub fn find_first_in(&self, at: &[usize], tag: &str) -> Option<NodePath> {
        self.find_all_in(at, tag).into_iter().next()
    }

    /// The whitespace-only text node immediately before `path`, if any.
    pub fn leading_whitespace(&self, path: &[usize]) -> Option<&str> {
        let (&index, parent) = path.split_last()?;
        let previous = self.element(parent)?.children.get(index.checked_sub(1)?)?;
        match previous {
            Node::Text(text) if previous.is_whitespace() => Some(text.as_str()),
            _ => None,
        }
    }

    /// Insert `nodes` right after the node at `path`.
    pub fn insert_after(&mut self, path: &[usize], nodes: Vec<Node>) -> bool {
        let Some((&index, parent)) = path.split_last() else {
            return false;
        };
        let Some(parent) = self.element_mut(parent) else {
            return false;
        };
        if index >= parent.children.len() {
            return false;
        }
        parent.children.splice(index + 1..index + 1, nodes);
        true
    }

    /// Detach and return the node at `path`.
    pub fn remove(&mut self, path: &[usize]) -> Option<Node> {
        let (&index, parent) = path.split_last()?;
        let parent = self.element_mut(parent)?;
        (index < parent.children.len()).then(|| parent.children.remove(index))
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.root.children {
            node.write_html(&mut out);
        }
        out
    }
}

fn close(open: &mut Vec<Element>, has_end_tag: bool) {
    if let Some(mut element) = open.pop() {
        element.has_end_tag = has_end_tag;
        if let Some(parent) = open.last_mut() {
            parent.children.push(Node::Element(element));
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    StartTag {
        name: String,
        attrs: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag(String),
    Text(String),
    Comment(String),
    Declaration(String),
}

fn opens_tag(s: &str) -> bool {
    let mut chars = s.chars();
    if chars.next() != Some('<') {
        return false;
    }
    match chars.next() {
        Some('!') | Some('?') => true,
        Some('/') => chars.next().is_some_and(|c| c.is_ascii_alphabetic()),
        Some(c) => c.is_ascii_alphabetic(),
        None => false,
    }
}

struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
    raw_text_end: Option<String>,
}

impl<'a> Tokenizer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            raw_text_end: None,
        }
    }

    fn rest(&self) -> &'a str {
        let source = self.source;
        &source[self.pos..]
    }

    fn error(&self, reason: impl Into<String>) -> MarkupError {
        MarkupError {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !keep(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn next_token(&mut self) -> Result<Option<Token>, MarkupError> {
        if let Some(name) = self.raw_text_end.take() {
            if let Some(token) = self.raw_text(&name) {
                return Ok(Some(token));
            }
        }

        let rest = self.rest();
        if rest.is_empty() {
            return Ok(None);
        }
        if let Some(body) = rest.strip_prefix("<!--") {
            let end = body
                .find("-->")
                .ok_or_else(|| self.error("unterminated comment"))?;
            self.pos += 4 + end + 3;
            return Ok(Some(Token::Comment(body[..end].to_string())));
        }
        if !opens_tag(rest) {
            return Ok(Some(self.text()));
        }
        if rest.starts_with("</") {
            return self.end_tag().map(Some);
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = rest
                .find('>')
                .ok_or_else(|| self.error("unterminated declaration"))?;
            self.pos += end + 1;
            return Ok(Some(Token::Declaration(rest[1..end].to_string())));
        }
        self.start_tag().map(Some)
    }

    fn text(&mut self) -> Token {
        let rest = self.rest();
        // The first character is text even when it is a stray '<'.
        let mut end = rest.chars().next().map_or(0, char::len_utf8);
        loop {
            match rest[end..].find('<') {
                Some(offset) if opens_tag(&rest[end + offset..]) => {
                    end += offset;
                    break;
                }
                Some(offset) => end += offset + 1,
                None => {
                    end = rest.len();
                    break;
                }
            }
        }
        self.pos += end;
        Token::Text(rest[..end].to_string())
    }

    fn raw_text(&mut self, name: &str) -> Option<Token> {
        let rest = self.rest();
        let end = rest
            .to_ascii_lowercase()
            .find(&format!("</{name}"))
            .unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        self.pos += end;
        Some(Token::Text(rest[..end].to_string()))
    }

    fn end_tag(&mut self) -> Result<Token, MarkupError> {
        let rest = self.rest();
        let end = rest
            .find('>')
            .ok_or_else(|| self.error("unterminated end tag"))?;
        let name = rest[2..end]
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        self.pos += end + 1;
        Ok(Token::EndTag(name))
    }

    fn start_tag(&mut self) -> Result<Token, MarkupError> {
        self.pos += 1;
        let name = self
            .take_while(|c| !c.is_whitespace() && c != '/' && c != '>')
            .to_ascii_lowercase();
        let mut attrs = Vec::new();
        loop {
            self.take_while(char::is_whitespace);
            let rest = self.rest();
            if rest.is_empty() {
                return Err(self.error(format!("unterminated <{name}> tag")));
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok(self.opened(name, attrs, true));
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Ok(self.opened(name, attrs, false));
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }

            let attr_name = self
                .take_while(|c| !c.is_whitespace() && !matches!(c, '=' | '>' | '/'))
                .to_ascii_lowercase();
            if attr_name.is_empty() {
                // A stray '=' with no name.
                self.pos += 1;
                continue;
            }
            self.take_while(char::is_whitespace);
            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.take_while(char::is_whitespace);
                Some(self.attr_value(&name)?)
            } else {
                None
            };
            attrs.push(Attribute {
                name: attr_name,
                value,
            });
        }
    }

    fn attr_value(&mut self, tag: &str) -> Result<String, MarkupError> {
        let rest = self.rest();
        match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &rest[1..];
                let end = body
                    .find(quote)
                    .ok_or_else(|| self.error(format!("unterminated attribute value in <{tag}>")))?;
                self.pos += end + 2;
                Ok(decode_entities(&body[..end]))
            }
            _ => Ok(decode_entities(
                self.take_while(|c| !c.is_whitespace() && c != '>'),
            )),
        }
    }

    fn opened(&mut self, name: String, attrs: Vec<Attribute>, self_closing: bool) -> Token {
        if !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            self.raw_text_end = Some(name.clone());
        }
        Token::StartTag {
            name,
            attrs,
            self_closing,
        }
    }
}
