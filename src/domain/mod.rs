//! Domain layer: the visual document and what a leaf is
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod document;
pub mod error;
pub mod leaf;
pub mod page;
pub mod query;
pub mod style;

pub use document::{Attribute, DocNode, NodeKind, SvgDocument};
pub use error::DomainError;
pub use leaf::{find_marker, leaf_views, leaves, LeafNode, LeafShape, LeafView, MarkerSelector};
pub use page::{Page, QueryInput};
pub use query::{MatchMode, Query};
pub use style::{InlineStyle, Visibility};
