//! Interaction controller: search, clear and click-to-highlight
//!
//! Each operation is a single synchronous pass over the page. Nothing is
//! remembered between calls; the document itself is the only state.
//! `search` and `clear` return `false`, telling the host not to run its
//! default action for the triggering event (form submit, button click).

use generational_arena::Index;
use tracing::{debug, info, instrument, warn};

use crate::config::Settings;
use crate::domain::{
    leaves, DomainError, LeafNode, LeafShape, MatchMode, Page, Query, SvgDocument,
};

/// Fill colors written on labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicators {
    /// Labels matched by a search
    pub matched: String,
    /// Label of a clicked leaf
    pub selected: String,
}

impl Default for Indicators {
    fn default() -> Self {
        Self {
            matched: "blue".into(),
            selected: "red".into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    shape: LeafShape,
    indicators: Indicators,
    mode: MatchMode,
}

impl InteractionController {
    pub fn new(shape: LeafShape, indicators: Indicators, mode: MatchMode) -> Self {
        Self {
            shape,
            indicators,
            mode,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.leaf.clone(),
            Indicators {
                matched: settings.match_color.clone(),
                selected: settings.selected_color.clone(),
            },
            settings.match_mode,
        )
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn shape(&self) -> &LeafShape {
        &self.shape
    }

    /// Validate query text under the current match mode.
    pub fn compile(&self, text: &str) -> Result<Option<Query>, DomainError> {
        Query::parse(text, self.mode)
    }

    /// Leaves whose label matches `query`, in document order.
    pub fn matching(&self, doc: &SvgDocument, query: &Query) -> Vec<LeafNode> {
        leaves(doc, &self.shape)
            .into_iter()
            .filter(|leaf| query.matches(&leaf.label_text(doc)))
            .collect()
    }

    /// Show and color every label containing the page's current query.
    ///
    /// An empty query does nothing. Non-matching labels keep their state.
    /// An invalid pattern (pattern mode only) is logged and skipped.
    #[instrument(level = "debug", skip(self, page), fields(query = %page.query()))]
    pub fn search(&self, page: &mut Page) -> bool {
        if let Err(e) = self.apply_search(page) {
            warn!("search skipped: {e}");
        }
        false
    }

    /// The search pass itself, reporting the number of labels shown.
    ///
    /// `Ok(None)` means the query was empty. An invalid pattern is returned
    /// as an error and leaves the document untouched.
    pub fn apply_search(&self, page: &mut Page) -> Result<Option<usize>, DomainError> {
        let Some(query) = self.compile(page.query())? else {
            debug!("empty query, nothing to search");
            return Ok(None);
        };

        let matched = self.matching(&page.document, &query);
        for leaf in &matched {
            leaf.show(&mut page.document, &self.indicators.matched);
        }
        info!(matched = matched.len(), "search applied");
        Ok(Some(matched.len()))
    }

    /// Hide every label and empty the query input.
    #[instrument(level = "debug", skip(self, page))]
    pub fn clear(&self, page: &mut Page) -> bool {
        let all = leaves(&page.document, &self.shape);
        for leaf in &all {
            leaf.hide(&mut page.document);
        }
        page.set_query("");
        info!(hidden = all.len(), "labels cleared");
        false
    }

    /// Show the clicked marker's sibling label in the selected color.
    ///
    /// Precondition: `marker` has a parent with at least two element
    /// children. When it does not, nothing changes.
    #[instrument(level = "debug", skip(self, doc))]
    pub fn highlight_one(&self, doc: &mut SvgDocument, marker: Index) {
        match LeafNode::from_marker(doc, marker) {
            Some(leaf) => {
                leaf.show(doc, &self.indicators.selected);
                debug!(label = %leaf.label_text(doc), "leaf highlighted");
            }
            None => warn!("clicked element has no sibling label, ignoring"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Visibility;

    const FRUIT: &str = r#"<svg>
  <g><circle id="m0"/><text style="display: none">apple</text></g>
  <g><circle id="m1"/><text style="display: none">banana</text></g>
  <g><circle id="m2"/><text style="display: none">grape</text></g>
</svg>"#;

    fn page(query: &str) -> Page {
        let mut page = Page::new(SvgDocument::parse(FRUIT).unwrap(), "query");
        page.set_query(query);
        page
    }

    fn states(page: &Page) -> Vec<(String, Option<Visibility>, Option<String>)> {
        crate::domain::leaf_views(&page.document, &LeafShape::default())
            .into_iter()
            .map(|v| (v.label, v.visibility, v.fill))
            .collect()
    }

    #[test]
    fn given_an_when_search_then_only_banana_shown_blue() {
        let mut page = page("an");
        let handled = InteractionController::default().search(&mut page);
        assert!(!handled);
        let s = states(&page);
        assert_eq!(s[0].1, Some(Visibility::Hidden));
        assert_eq!(s[1].1, Some(Visibility::Shown));
        assert_eq!(s[1].2.as_deref(), Some("blue"));
        assert_eq!(s[2].1, Some(Visibility::Hidden));
        assert_eq!(s[2].2, None);
    }

    #[test]
    fn given_empty_query_when_search_then_document_unchanged() {
        let mut page = page("");
        let before = page.document.to_svg_string();
        assert!(!InteractionController::default().search(&mut page));
        assert_eq!(page.document.to_svg_string(), before);
    }

    #[test]
    fn given_invalid_pattern_when_search_then_nothing_changes() {
        let mut page = page("(");
        let before = page.document.to_svg_string();
        let controller = InteractionController::default().with_mode(MatchMode::Pattern);
        assert!(!controller.search(&mut page));
        assert_eq!(page.document.to_svg_string(), before);
    }

    #[test]
    fn given_search_result_when_clear_then_all_hidden_and_query_empty() {
        let mut page = page("a");
        let controller = InteractionController::default();
        controller.search(&mut page);
        assert!(!controller.clear(&mut page));
        assert!(states(&page)
            .iter()
            .all(|(_, vis, _)| *vis == Some(Visibility::Hidden)));
        assert_eq!(page.query(), "");
    }

    #[test]
    fn given_marker_when_highlight_one_then_only_sibling_shown_red() {
        let mut page = page("");
        let marker = page.document.find_by_id("m2").unwrap();
        InteractionController::default().highlight_one(&mut page.document, marker);
        let s = states(&page);
        assert_eq!(s[2].1, Some(Visibility::Shown));
        assert_eq!(s[2].2.as_deref(), Some("red"));
        assert_eq!(s[0].1, Some(Visibility::Hidden));
        assert_eq!(s[1].1, Some(Visibility::Hidden));
    }

    #[test]
    fn given_custom_indicators_when_search_then_uses_configured_color() {
        let mut page = page("grape");
        let controller = InteractionController::new(
            LeafShape::default(),
            Indicators {
                matched: "#00f".into(),
                selected: "#f00".into(),
            },
            MatchMode::Literal,
        );
        controller.search(&mut page);
        assert_eq!(states(&page)[2].2.as_deref(), Some("#00f"));
    }

    #[test]
    fn given_query_when_apply_search_then_reports_match_count() {
        let controller = InteractionController::default();
        let mut empty = page("");
        assert_eq!(controller.apply_search(&mut empty).unwrap(), None);
        let mut page = page("a");
        assert_eq!(controller.apply_search(&mut page).unwrap(), Some(3));
    }

    #[test]
    fn given_invalid_pattern_when_apply_search_then_error_and_document_unchanged() {
        let mut page = page("[");
        let before = page.document.to_svg_string();
        let controller = InteractionController::default().with_mode(MatchMode::Pattern);
        let err = controller.apply_search(&mut page).unwrap_err();
        assert!(matches!(err, DomainError::InvalidPattern { .. }));
        assert_eq!(page.document.to_svg_string(), before);
    }
}
