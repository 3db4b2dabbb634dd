use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    services::gemini::TextGenerator,
    store::SwapStore,
    utils::{Config, RateLimiter},
};

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SwapStore>,
    pub generator: Arc<dyn TextGenerator>,
    pub config: Config,
    pub relay_limiter: Arc<Mutex<RateLimiter>>,
}

impl AppState {
    pub fn new(store: Arc<dyn SwapStore>, generator: Arc<dyn TextGenerator>, config: Config) -> Self {
        let relay_limiter = Arc::new(Mutex::new(RateLimiter::new(config.relay_rate_limit_per_minute)));
        Self {
            store,
            generator,
            config,
            relay_limiter,
        }
    }

    /// Counts a relay / generator call against the caller's budget
    pub async fn allow_relay_call(&self, client_key: &str) -> bool {
        self.relay_limiter.lock().await.can_make_request(client_key)
    }
}
