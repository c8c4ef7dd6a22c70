//! Arena-backed visual document
//!
//! The rendered tree is held as a generational arena of element and text
//! nodes. Parent/child links are arena indices, so a leaf can keep handles to
//! its marker and label while the document is mutated through `&mut self`.

use std::fmt::Write as _;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::DomainError;
use crate::domain::style::InlineStyle;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A single attribute, name kept in its qualified (`prefix:local`) form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Element {
        /// Qualified tag name as written in the source
        name: String,
        /// Attributes in source order, namespace declarations first
        attributes: Vec<Attribute>,
    },
    Text(String),
}

/// Node in the arena-based document.
#[derive(Debug)]
pub struct DocNode {
    pub kind: NodeKind,
    /// Index of the parent element, None for the root element
    pub parent: Option<Index>,
    /// Child nodes (elements and text) in document order
    pub children: Vec<Index>,
}

impl DocNode {
    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    /// Tag name without namespace prefix; None for text nodes.
    pub fn local_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { name, .. } => Some(local_part(name)),
            NodeKind::Text(_) => None,
        }
    }
}

/// In-memory SVG (or any XML) document.
#[derive(Debug)]
pub struct SvgDocument {
    arena: Arena<DocNode>,
    root: Option<Index>,
}

impl SvgDocument {
    /// Parse SVG/XML text. Comments and processing instructions are dropped;
    /// CDATA sections become plain text.
    #[instrument(level = "debug", skip(text), fields(len = text.len()))]
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let mut options = roxmltree::ParsingOptions::default();
        options.allow_dtd = true;
        let xml = roxmltree::Document::parse_with_options(text, options)
            .map_err(|e| DomainError::Parse(e.to_string()))?;

        let mut doc = Self {
            arena: Arena::new(),
            root: None,
        };
        let root = doc.import(xml.root_element(), None);
        doc.root = root;
        debug!("parsed document with {} nodes", doc.arena.len());
        Ok(doc)
    }

    fn import(&mut self, node: roxmltree::Node<'_, '_>, parent: Option<Index>) -> Option<Index> {
        let kind = if node.is_element() {
            let tag = node.tag_name();
            let mut attributes = declared_namespaces(node);
            for attr in node.attributes() {
                attributes.push(Attribute::new(
                    qualified_name(node, attr.namespace(), attr.name()),
                    attr.value(),
                ));
            }
            NodeKind::Element {
                name: qualified_name(node, tag.namespace(), tag.name()),
                attributes,
            }
        } else if node.is_text() {
            NodeKind::Text(node.text().unwrap_or_default().to_string())
        } else {
            return None;
        };

        let idx = self.insert_node(kind, parent);
        for child in node.children() {
            self.import(child, Some(idx));
        }
        Some(idx)
    }

    fn insert_node(&mut self, kind: NodeKind, parent: Option<Index>) -> Index {
        let idx = self.arena.insert(DocNode {
            kind,
            parent,
            children: Vec::new(),
        });
        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(idx);
            }
        }
        idx
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn get(&self, idx: Index) -> Option<&DocNode> {
        self.arena.get(idx)
    }

    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.arena.get(idx).and_then(|n| n.parent)
    }

    pub fn local_name(&self, idx: Index) -> Option<&str> {
        self.arena.get(idx).and_then(DocNode::local_name)
    }

    /// Element children only, like the DOM `children` collection.
    pub fn element_children(&self, idx: Index) -> Vec<Index> {
        self.arena
            .get(idx)
            .map(|node| {
                node.children
                    .iter()
                    .copied()
                    .filter(|&c| self.arena.get(c).is_some_and(DocNode::is_element))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All elements in document order, root first.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants::new(self)
    }

    /// Elements whose local tag name equals `tag`, in document order.
    pub fn elements_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = Index> + 'a {
        self.descendants()
            .filter(move |&idx| self.local_name(idx) == Some(tag))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, idx: Index) -> String {
        let mut out = String::new();
        self.collect_text(idx, &mut out);
        out
    }

    fn collect_text(&self, idx: Index, out: &mut String) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for &child in &node.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    pub fn attribute(&self, idx: Index, name: &str) -> Option<&str> {
        match &self.arena.get(idx)?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// Set an attribute, replacing an existing value in place or appending.
    /// Text nodes are left alone.
    pub fn set_attribute(&mut self, idx: Index, name: &str, value: &str) {
        let Some(node) = self.arena.get_mut(idx) else {
            return;
        };
        if let NodeKind::Element { attributes, .. } = &mut node.kind {
            match attributes.iter_mut().find(|a| a.name == name) {
                Some(attr) => attr.value = value.to_string(),
                None => attributes.push(Attribute::new(name, value)),
            }
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<Index> {
        self.descendants()
            .find(|&idx| self.attribute(idx, "id") == Some(id))
    }

    /// Parsed inline `style` attribute of an element.
    pub fn style(&self, idx: Index) -> InlineStyle {
        self.attribute(idx, "style")
            .map(InlineStyle::parse)
            .unwrap_or_default()
    }

    /// Set one style declaration, keeping the others.
    pub fn set_style_property(&mut self, idx: Index, property: &str, value: &str) {
        if !self.arena.get(idx).is_some_and(DocNode::is_element) {
            return;
        }
        let mut style = self.style(idx);
        style.set(property, value);
        self.set_attribute(idx, "style", &style.to_string());
    }

    /// Serialize back to XML text with a leading XML declaration.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        if let Some(root) = self.root {
            self.write_node(root, &mut out);
        }
        out.push('\n');
        out
    }

    fn write_node(&self, idx: Index, out: &mut String) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(text) => escape_xml_into(out, text, false),
            NodeKind::Element { name, attributes } => {
                out.push('<');
                out.push_str(name);
                for attr in attributes {
                    let _ = write!(out, " {}=\"", attr.name);
                    escape_xml_into(out, &attr.value, true);
                    out.push('"');
                }
                if node.children.is_empty() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for &child in &node.children {
                    self.write_node(child, out);
                }
                let _ = write!(out, "</{name}>");
            }
        }
    }
}

/// Pre-order iterator over element nodes.
pub struct Descendants<'a> {
    doc: &'a SvgDocument,
    stack: Vec<Index>,
}

impl<'a> Descendants<'a> {
    fn new(doc: &'a SvgDocument) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = doc.root() {
            stack.push(root);
        }
        Self { doc, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = Index;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            let Some(node) = self.doc.get(current) else {
                continue;
            };
            if !node.is_element() {
                continue;
            }
            // Push children in reverse order for left-to-right traversal
            for &child in node.children.iter().rev() {
                self.stack.push(child);
            }
            return Some(current);
        }
        None
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    let prefix = namespace.and_then(|uri| {
        if uri == XML_NS {
            Some("xml")
        } else {
            node.lookup_prefix(uri)
        }
    });
    let prefix = prefix.filter(|p| !p.is_empty());
    match prefix {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

/// Namespace declarations introduced on this element (not inherited).
fn declared_namespaces(node: roxmltree::Node<'_, '_>) -> Vec<Attribute> {
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();

    node.namespaces()
        .filter(|ns| ns.uri() != XML_NS)
        .filter(|ns| !inherited.contains(&(ns.name(), ns.uri())))
        .map(|ns| match ns.name() {
            Some(prefix) => Attribute::new(format!("xmlns:{prefix}"), ns.uri()),
            None => Attribute::new("xmlns", ns.uri()),
        })
        .collect()
}

fn escape_xml_into(out: &mut String, text: &str, attribute: bool) {
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' if !attribute => "&gt;",
            b'"' if attribute => "&quot;",
            _ => continue,
        };
        out.push_str(&text[start..i]);
        out.push_str(esc);
        start = i + 1;
    }
    out.push_str(&text[start..]);
}
