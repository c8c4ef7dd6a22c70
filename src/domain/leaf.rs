//! Leaf nodes of the rendered tree
//!
//! A leaf is a group element holding exactly two element children: a marker
//! shape followed by a text label. `LeafNode` carries handles to all three
//! parts so interaction code never indexes raw children itself.

use std::fmt;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::document::SvgDocument;
use crate::domain::error::DomainError;
use crate::domain::style::Visibility;

/// Tag names that make up a leaf group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafShape {
    pub group_tag: String,
    pub marker_tag: String,
    pub label_tag: String,
}

impl Default for LeafShape {
    fn default() -> Self {
        Self {
            group_tag: "g".into(),
            marker_tag: "circle".into(),
            label_tag: "text".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafNode {
    pub group: Index,
    pub marker: Index,
    pub label: Index,
}

impl LeafNode {
    /// Recognize `group` as a leaf. Anything but the exact
    /// group(marker, label) shape yields None.
    pub fn recognize(doc: &SvgDocument, group: Index, shape: &LeafShape) -> Option<Self> {
        if doc.local_name(group)? != shape.group_tag {
            return None;
        }
        let children = doc.element_children(group);
        let [marker, label] = children.as_slice() else {
            return None;
        };
        if doc.local_name(*marker)? != shape.marker_tag
            || doc.local_name(*label)? != shape.label_tag
        {
            return None;
        }
        Some(Self {
            group,
            marker: *marker,
            label: *label,
        })
    }

    /// Resolve the leaf a clicked marker belongs to: the marker's parent and
    /// that parent's second element child. Tags are not checked.
    ///
    /// Returns None when the marker has no parent or the parent has fewer
    /// than two element children.
    pub fn from_marker(doc: &SvgDocument, marker: Index) -> Option<Self> {
        let group = doc.parent(marker)?;
        let label = *doc.element_children(group).get(1)?;
        Some(Self {
            group,
            marker,
            label,
        })
    }

    pub fn label_text(&self, doc: &SvgDocument) -> String {
        doc.text_content(self.label)
    }

    /// Make the label visible and paint it with `color`.
    pub fn show(&self, doc: &mut SvgDocument, color: &str) {
        doc.set_style_property(self.label, Visibility::PROPERTY, Visibility::Shown.css_value());
        doc.set_style_property(self.label, "fill", color);
    }

    pub fn hide(&self, doc: &mut SvgDocument) {
        doc.set_style_property(self.label, Visibility::PROPERTY, Visibility::Hidden.css_value());
    }

    pub fn view(&self, doc: &SvgDocument, position: usize) -> LeafView {
        let style = doc.style(self.label);
        LeafView {
            position,
            label: self.label_text(doc),
            marker_id: doc.attribute(self.marker, "id").map(str::to_string),
            visibility: style.visibility(),
            fill: style.get("fill").map(str::to_string),
        }
    }
}

/// All leaves in document order.
#[instrument(level = "debug", skip(doc))]
pub fn leaves(doc: &SvgDocument, shape: &LeafShape) -> Vec<LeafNode> {
    doc.elements_by_tag(&shape.group_tag)
        .filter_map(|group| LeafNode::recognize(doc, group, shape))
        .collect()
}

/// Read-only snapshot of a leaf for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafView {
    pub position: usize,
    pub label: String,
    pub marker_id: Option<String>,
    /// None when the label has no `display` declaration
    pub visibility: Option<Visibility>,
    pub fill: Option<String>,
}

pub fn leaf_views(doc: &SvgDocument, shape: &LeafShape) -> Vec<LeafView> {
    leaves(doc, shape)
        .iter()
        .enumerate()
        .map(|(position, leaf)| leaf.view(doc, position))
        .collect()
}

/// How the host identifies the marker that was clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerSelector {
    /// Element id of the marker
    Id(String),
    /// 0-based position among recognized leaves
    Position(usize),
}

impl fmt::Display for MarkerSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerSelector::Id(id) => write!(f, "id {id:?}"),
            MarkerSelector::Position(pos) => write!(f, "leaf #{pos}"),
        }
    }
}

pub fn find_marker(
    doc: &SvgDocument,
    shape: &LeafShape,
    selector: &MarkerSelector,
) -> Result<Index, DomainError> {
    let found = match selector {
        MarkerSelector::Id(id) => doc.find_by_id(id),
        MarkerSelector::Position(pos) => leaves(doc, shape).get(*pos).map(|leaf| leaf.marker),
    };
    found.ok_or_else(|| DomainError::MarkerNotFound(selector.to_string()))
}
