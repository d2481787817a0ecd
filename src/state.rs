use std::sync::Arc;

use crate::config::RankingsConfig;
use crate::provider::DataProvider;

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub config: RankingsConfig,
    pub provider: Arc<dyn DataProvider>,
}

impl AppState {
    pub fn new(config: RankingsConfig, provider: Arc<dyn DataProvider>) -> Arc<Self> {
        Arc::new(Self { config, provider })
    }
}
