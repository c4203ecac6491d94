//! Application state

use anyhow::Result;
use std::sync::Arc;

use braindiff_core::adapter::{AnalyticsStore, PostgresStore};

use crate::config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Analytics store backing every read endpoint
    pub store: Arc<dyn AnalyticsStore>,
    /// Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create new application state connected to the analytics database
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let store = PostgresStore::connect(&config.database_url).await?;

        Ok(Self {
            store: Arc::new(store),
            config: Arc::new(config.clone()),
        })
    }

    /// Build state around an arbitrary store, used by handler tests
    pub fn with_store(store: Arc<dyn AnalyticsStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
