//! Application state.
//!
//! The composition root: builds the store, the generation client (when a
//! credential is present), the generator and the scheduler exactly once.

use anyhow::Result;
use autopress_core::generation::HuggingFaceClient;
use autopress_core::{ArticleGenerator, ArticleStore, Database, TextGenerator};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::config::Config;
use crate::services::InventoryScheduler;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Database connection
    pub db: Arc<Database>,
    /// Generation pipeline
    pub generator: Arc<ArticleGenerator>,
    /// Daily trigger and startup replenishment
    pub scheduler: Arc<InventoryScheduler>,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config, db: Database) -> Result<Arc<Self>> {
        let db = Arc::new(db);
        let store: Arc<dyn ArticleStore> = db.clone();

        let client: Option<Arc<dyn TextGenerator>> = match config.api_key.as_deref() {
            Some(key) => {
                let client = HuggingFaceClient::new(key, config.generation.client_options())?;
                info!(endpoint = %client.endpoint(), "Generation client configured");
                Some(Arc::new(client) as Arc<dyn TextGenerator>)
            }
            None => None,
        };

        let generator = Arc::new(ArticleGenerator::new(Arc::clone(&store), client));
        let scheduler = Arc::new(InventoryScheduler::new(
            Arc::clone(&generator),
            store,
            config.schedule.clone(),
        ));

        Ok(Arc::new(Self {
            config: Arc::new(config),
            db,
            generator,
            scheduler,
            start_time: Instant::now(),
        }))
    }
}
