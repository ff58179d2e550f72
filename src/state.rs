use std::sync::Arc;

use crate::assets::AssetStore;
use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::service::CharacterService;
use crate::store::CharacterStore;

/// The shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Character operations over the injected store.
    pub characters: CharacterService,
    /// Uploaded image files.
    pub assets: AssetStore,
    pub config: Arc<AppConfig>,
    pub metrics: Metrics,
}

impl AppState {
    /// Wires the service and asset handler from configuration.
    pub fn new(store: Arc<dyn CharacterStore>, config: AppConfig) -> Self {
        let assets = AssetStore::new(config.uploads.dir.clone(), config.uploads.max_file_bytes);
        Self {
            characters: CharacterService::new(store),
            assets,
            config: Arc::new(config),
            metrics: Metrics::new(),
        }
    }
}
