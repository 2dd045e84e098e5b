//! # HTTP Server for Slot Resolution
//!
//! Exposes the resolver, the binder and the composition engine over JSON.
//!
//! ## Usage
//!
//! ```bash
//! vitrine serve --listen 0.0.0.0:8080
//! ```
//!
//! | Route | Result |
//! |-------|--------|
//! | `GET /api/pages/:page/slots` | slot map for a page |
//! | `GET /api/pages/:page/sections/:section` | ordered section records |
//! | `GET /api/slots/:slot_id` | one record, 404 when absent |
//! | `POST /api/pages/:page/bind` | bound and composed slots (`?debug-slots` for overlay data) |
//! | `POST /api/compose` | resolved visual for a composition spec |
//! | `GET /api/registry` | registry table names |
//! | `GET /api/cache` | query cache counters |

mod handlers;
mod state;

pub use handlers::bind::{BindRequest, BindResponse, BoundSlot, DebugLabel, SlotRequest};
pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::cache::QueryCache;
use crate::error::VitrineError;
use crate::store::SlotRecord;

/// How often expired cache entries are swept.
pub const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Slot API
        .route("/api/pages/:page/slots", get(handlers::slots::page))
        .route(
            "/api/pages/:page/sections/:section",
            get(handlers::slots::section),
        )
        .route("/api/slots/:slot_id", get(handlers::slots::one))
        .route("/api/pages/:page/bind", post(handlers::bind::bind))
        // Composition API
        .route("/api/compose", post(handlers::compose::compose))
        .route("/api/registry", get(handlers::compose::registry))
        // Status
        .route("/api/cache", get(handlers::status::cache))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use vitrine::{Config, SlotResolver, cache::QueryCache, store::MemoryContentStore};
/// use vitrine::server::{AppState, ServerConfig, serve};
///
/// # async fn example() -> Result<(), vitrine::VitrineError> {
/// let config = Config::default();
/// let cache = Arc::new(QueryCache::from_config(&config.cache));
/// let resolver = SlotResolver::new(Arc::new(MemoryContentStore::default()), cache);
///
/// serve(
///     ServerConfig { listen_addr: "0.0.0.0:8080".to_string() },
///     AppState::new(config, resolver),
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig, state: AppState) -> Result<(), VitrineError> {
    let state = Arc::new(state);

    spawn_eviction(state.resolver.cache().clone(), EVICTION_INTERVAL);

    let app = router(state.clone());

    tracing::info!(
        listen = %config.listen_addr,
        environment = %state.config.environment,
        cache_ttl_secs = state.resolver.cache().ttl().as_secs(),
        "vitrine HTTP server starting"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            VitrineError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| VitrineError::Server(e.to_string()))?;

    Ok(())
}

/// Spawn the background task that drops expired query cache entries every
/// `period`. The first sweep runs immediately.
pub fn spawn_eviction(
    cache: Arc<QueryCache<Vec<SlotRecord>>>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;
            let removed = cache.evict_expired().await;
            if removed > 0 {
                let remaining = cache.len().await;
                tracing::debug!(removed, remaining, "cleaned up expired cache entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, ManualClock, params};

    #[tokio::test]
    async fn test_eviction_task_sweeps_expired_entries() {
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(QueryCache::new(clock.clone(), Duration::from_secs(10), 100));
        let stale = CacheKey::new("stale", &params([("n", 1)]));
        cache.put(stale.clone(), Vec::new()).await;
        clock.advance(Duration::from_secs(11));
        let fresh = CacheKey::new("fresh", &params([("n", 2)]));
        cache.put(fresh.clone(), Vec::new()).await;

        let task = spawn_eviction(cache.clone(), Duration::from_millis(5));
        for _ in 0..200 {
            if !cache.contains(&stale).await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        task.abort();

        assert!(!cache.contains(&stale).await);
        assert!(cache.contains(&fresh).await);
    }
}
