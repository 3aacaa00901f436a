use std::sync::Arc;

use crate::config::Config;

/// Shared application state passed to all handlers.
///
/// The reqwest client pools upstream connections and is cheap to clone; each
/// in-flight streaming request otherwise owns its own state (tail buffer,
/// response body), so nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }
}
