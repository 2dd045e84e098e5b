//! Composition handlers.

use axum::Json;

use crate::compose::{self, CompositionSpec, ResolvedVisual};
use crate::registry::{self, RegistryListing};

/// POST /api/compose - Resolve a composition spec.
pub async fn compose(Json(spec): Json<CompositionSpec>) -> Json<ResolvedVisual> {
    Json(compose::compose(&spec))
}

/// GET /api/registry - Names of every registry table.
pub async fn registry() -> Json<RegistryListing> {
    Json(registry::listing())
}
