use std::sync::Arc;
use std::time::Duration;

use lembranca_core::cache::TtlCache;
use lembranca_db::models::memorial::Memorial;

use crate::config::ServerConfig;
use crate::payments::{self, PaymentProvider};

/// Public memorial listings keyed by the `historical` filter.
pub type PublicMemorialCache = TtlCache<Option<bool>, Arc<Vec<Memorial>>>;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc` or already shares storage.
#[derive(Clone)]
pub struct AppState {
    pub pool: lembranca_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Cache in front of `GET /memorials/public`.
    pub memorial_cache: PublicMemorialCache,
    pub payments: Arc<dyn PaymentProvider>,
}

impl AppState {
    pub fn new(pool: lembranca_db::DbPool, config: ServerConfig) -> Self {
        let payments = payments::provider_from_config(&config);
        Self::with_provider(pool, config, payments)
    }

    pub fn with_provider(
        pool: lembranca_db::DbPool,
        config: ServerConfig,
        payments: Arc<dyn PaymentProvider>,
    ) -> Self {
        let memorial_cache =
            TtlCache::new(Duration::from_secs(config.memorial_cache_ttl_secs));
        Self {
            pool,
            config: Arc::new(config),
            memorial_cache,
            payments,
        }
    }
}
