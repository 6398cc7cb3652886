//! Shared server state

use parking_lot::RwLock;
use std::sync::Arc;

use portal_assist_agent::SearchService;

/// Application state shared across request handlers
///
/// The service is immutable per index version; the lock exists only so a
/// retrained index can be swapped in atomically without interrupting
/// in-flight requests, which keep their own `Arc`.
#[derive(Clone)]
pub struct AppState {
    service: Arc<RwLock<Arc<SearchService>>>,
}

impl AppState {
    pub fn new(service: Arc<SearchService>) -> Self {
        Self {
            service: Arc::new(RwLock::new(service)),
        }
    }

    /// Current service handle for one request
    pub fn service(&self) -> Arc<SearchService> {
        self.service.read().clone()
    }

    /// Swap in a freshly trained service
    pub fn replace(&self, service: Arc<SearchService>) {
        *self.service.write() = service;
        tracing::info!("search service swapped");
    }
}
