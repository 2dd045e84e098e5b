//! Slot lookup handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::{resolver::SlotImageMap, store::SlotRecord};

use super::super::state::AppState;

/// GET /api/pages/:page/slots - Every active slot on a page, keyed by id.
pub async fn page(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
) -> Json<SlotImageMap> {
    Json(state.resolver.resolve_by_page(&page).await)
}

/// GET /api/pages/:page/sections/:section - Ordered records of one section.
pub async fn section(
    State(state): State<Arc<AppState>>,
    Path((page, section)): Path<(String, String)>,
) -> Json<Vec<SlotRecord>> {
    Json(state.resolver.resolve_by_section(&page, &section).await)
}

/// GET /api/slots/:slot_id - A single slot record.
pub async fn one(
    State(state): State<Arc<AppState>>,
    Path(slot_id): Path<String>,
) -> Result<Json<SlotRecord>, (StatusCode, String)> {
    state
        .resolver
        .resolve_one(&slot_id)
        .await
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("No active slot '{}'", slot_id)))
}
