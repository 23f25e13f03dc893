//! Application state shared across HTTP handlers

use crate::core::model::MetricsConverter;
use crate::server::report::PageBuilder;
use crate::storage::StorageStrategy;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// All fields are reference counted so that every actix worker gets a cheap
/// clone of the same storage.
#[derive(Clone)]
pub struct AppState {
    /// In-memory store plus backup
    pub storage: Arc<StorageStrategy>,
    /// Wire record conversion and signature checks
    pub converter: Arc<MetricsConverter>,
    pub pages: PageBuilder,
}

impl AppState {
    pub fn new(storage: Arc<StorageStrategy>, converter: Arc<MetricsConverter>) -> Self {
        Self {
            storage,
            converter,
            pages: PageBuilder::new(),
        }
    }
}
