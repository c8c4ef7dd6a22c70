//! Interactive highlighting for SVG-rendered trees.
//!
//! A rendered tree is a document whose leaves are groups holding a marker
//! shape and a text label. [`application::InteractionController`] searches
//! labels by substring, clears all labels and highlights a single clicked
//! leaf, mutating the document in place. The CLI plays the role of the host
//! page that binds those operations to user events.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
