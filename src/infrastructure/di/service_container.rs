//! Service container for dependency injection
//!
//! Wires up the conversion service with its dependencies.

use std::sync::Arc;

use crate::application::services::ConversionService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub conversion: ConversionService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let conversion = ConversionService::new(Arc::clone(&fs), Arc::clone(&settings));

        Self {
            settings,
            fs,
            conversion,
        }
    }
}
