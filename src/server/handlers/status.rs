//! Cache status handler.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::cache::CacheStats;

use super::super::state::AppState;

#[derive(Debug, Serialize)]
pub struct CacheStatus {
    pub boot_time: u64,
    pub environment: String,
    #[serde(flatten)]
    pub stats: CacheStats,
}

/// GET /api/cache - Query cache counters.
pub async fn cache(State(state): State<Arc<AppState>>) -> Json<CacheStatus> {
    Json(CacheStatus {
        boot_time: state.boot_time,
        environment: state.config.environment.to_string(),
        stats: state.resolver.cache().stats().await,
    })
}
