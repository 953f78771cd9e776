//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::ShortLinkUseCase;
use crate::config::StorageBackend;
use crate::infrastructure::cache::MemoryTokenCache;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<dyn ShortLinkUseCase>,
    /// Shared with the service; read by the health check only.
    pub token_cache: Arc<MemoryTokenCache>,
    pub storage_backend: StorageBackend,
}

impl AppState {
    pub fn new(
        link_service: Arc<dyn ShortLinkUseCase>,
        token_cache: Arc<MemoryTokenCache>,
        storage_backend: StorageBackend,
    ) -> Self {
        Self {
            link_service,
            token_cache,
            storage_backend,
        }
    }
}
