//! Host page: the visual document plus its query input field

use generational_arena::Index;
use tracing::debug;

use crate::domain::document::SvgDocument;

/// The search input, found by id.
///
/// When the document holds an element with that id, the field's value is the
/// element's `value` attribute and writes go back to it. Otherwise the field
/// is detached and its value lives only as long as the page.
#[derive(Debug, Clone)]
pub struct QueryInput {
    id: String,
    value: String,
    bound: Option<Index>,
}

impl QueryInput {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }
}

#[derive(Debug)]
pub struct Page {
    pub document: SvgDocument,
    input: QueryInput,
}

impl Page {
    pub fn new(document: SvgDocument, field_id: &str) -> Self {
        let bound = document.find_by_id(field_id);
        let value = bound
            .and_then(|idx| document.attribute(idx, "value"))
            .unwrap_or_default()
            .to_string();
        debug!(field_id, bound = bound.is_some(), "query input resolved");
        Self {
            document,
            input: QueryInput {
                id: field_id.to_string(),
                value,
                bound,
            },
        }
    }

    pub fn input(&self) -> &QueryInput {
        &self.input
    }

    pub fn query(&self) -> &str {
        &self.input.value
    }

    pub fn set_query(&mut self, value: &str) {
        self.input.value = value.to_string();
        if let Some(idx) = self.input.bound {
            self.document.set_attribute(idx, "value", value);
        }
    }
}
