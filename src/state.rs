//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::dataset::DatasetService;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Owns the dataset cache and runs ingestion
    pub dataset: DatasetService,
}

impl AppState {
    pub fn new(dataset: DatasetService) -> Self {
        Self { dataset }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
