use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::image_client::ImageClient;
use crate::llm_client::LlmClient;
use crate::store::ContentStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Clients are `None` when their credential was not configured; the
/// orchestration flow turns that into a recoverable configuration error
/// before any outbound call is made.
///
/// The content store is the explicit session context: created empty at
/// startup, mutated only by the orchestration flow, discarded at shutdown.
/// The mutex is never held across an await; both remote calls complete before
/// the store is touched.
#[derive(Clone)]
pub struct AppState {
    pub llm: Option<LlmClient>,
    pub images: Option<ImageClient>,
    pub store: Arc<Mutex<ContentStore>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            llm: config.gemini_api_key.clone().map(LlmClient::new),
            images: config.unsplash_access_key.clone().map(ImageClient::new),
            store: Arc::new(Mutex::new(ContentStore::new())),
        }
    }
}
