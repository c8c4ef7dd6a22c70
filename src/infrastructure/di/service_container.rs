//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::controller::InteractionController;
use crate::application::services::PageService;
use crate::config::Settings;
use crate::infrastructure::error::InfraResult;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Load layered settings and wire real implementations.
    pub fn load() -> InfraResult<Self> {
        Ok(Self::new(Settings::load()?))
    }

    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    pub fn page_service(&self) -> PageService {
        PageService::new(Arc::clone(&self.fs), Arc::clone(&self.settings))
    }

    pub fn controller(&self) -> InteractionController {
        InteractionController::from_settings(&self.settings)
    }
}
