use std::sync::Arc;

use crate::services::providers::{CatalogProvider, MetadataProvider, SearchProvider};

/// Shared application state: one handle per upstream seam
///
/// Handlers never see concrete providers, only the trait objects, so tests
/// swap in stubs and the wiring stays in `main`.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub search: Arc<dyn SearchProvider>,
    pub metadata: Arc<dyn MetadataProvider>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        search: Arc<dyn SearchProvider>,
        metadata: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self {
            catalog,
            search,
            metadata,
        }
    }
}
