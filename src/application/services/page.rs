//! Page loading and saving
//!
//! Reads a rendered tree from disk into a `Page`, lets the caller dispatch
//! controller operations on it, and writes the mutated document back.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{Page, SvgDocument};
use crate::infrastructure::traits::FileSystem;

/// Service for reading and writing host pages.
pub struct PageService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl PageService {
    /// Create a new page service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Load and parse a document, binding the configured query input.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Page> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::DocumentNotFound(path.to_path_buf()));
        }
        let text = self
            .fs
            .read_to_string(path)
            .with_path_context("read document", path)?;
        let document = SvgDocument::parse(&text)?;
        Ok(Page::new(document, &self.settings.query_field_id))
    }

    /// Serialize the page's document to `path`, creating parent directories.
    #[instrument(level = "debug", skip(self, page))]
    pub fn save(&self, page: &Page, path: &Path) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        self.fs
            .write(path, &page.document.to_svg_string())
            .with_path_context("write document", path)?;
        debug!("saved {}", path.display());
        Ok(())
    }

    /// Load `input`, apply `op`, save to `output` (or back to `input`).
    pub fn update<T>(
        &self,
        input: &Path,
        output: Option<&Path>,
        op: impl FnOnce(&mut Page) -> ApplicationResult<T>,
    ) -> ApplicationResult<T> {
        let mut page = self.load(input)?;
        let result = op(&mut page)?;
        self.save(&page, output.unwrap_or(input))?;
        Ok(result)
    }
}
