//! Page binding handler.
//!
//! Resolves a page once, binds every requested slot against it and composes
//! the ones that carry a composition. With `?debug-slots` every slot is
//! composed with debug affordances and gets its overlay label and editor URL.

use axum::{
    Json,
    extract::{Path, RawQuery, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    binding::SlotBinding,
    compose::{CompositionSpec, ResolvedVisual, compose},
    debug::{self, DebugMode},
};

use super::super::state::AppState;

/// One slot the layout wants bound.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRequest {
    pub slot_id: String,
    #[serde(default)]
    pub default_label: Option<String>,
    #[serde(default)]
    pub composition: Option<CompositionSpec>,
}

/// Request body for the bind endpoint.
#[derive(Debug, Deserialize)]
pub struct BindRequest {
    pub slots: Vec<SlotRequest>,
}

/// Overlay data for one slot in debug mode.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugLabel {
    pub label: String,
    pub editor_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundSlot {
    #[serde(flatten)]
    pub binding: SlotBinding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual: Option<ResolvedVisual>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugLabel>,
}

#[derive(Debug, Serialize)]
pub struct BindResponse {
    pub page: String,
    pub debug: bool,
    pub slots: Vec<BoundSlot>,
}

/// POST /api/pages/:page/bind - Bind and compose a page's slots.
pub async fn bind(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
    RawQuery(query): RawQuery,
    Json(request): Json<BindRequest>,
) -> Json<BindResponse> {
    let mode = DebugMode::from_query(query.as_deref().unwrap_or(""));
    let page_slots = state.resolver.page_slots(&page).await;

    let slots = request
        .slots
        .into_iter()
        .map(|req| {
            let binding = page_slots.bind(&req.slot_id, req.default_label.as_deref());

            let spec = match (req.composition, mode) {
                (Some(spec), _) => Some(spec),
                (None, DebugMode::Active) => Some(CompositionSpec::default()),
                (None, DebugMode::Inactive) => None,
            };
            let spec = spec.map(|mut spec| {
                if spec.focal.is_none() {
                    spec.focal = binding.hotspot;
                }
                if mode.is_active() {
                    spec.debug = true;
                    spec.slot_id.get_or_insert_with(|| req.slot_id.clone());
                }
                spec
            });

            let debug = match (&spec, mode) {
                (Some(spec), DebugMode::Active) => Some(DebugLabel {
                    label: debug::describe(&req.slot_id, spec),
                    editor_url: state.config.studio.edit_url(&req.slot_id),
                }),
                _ => None,
            };

            let visual = spec.as_ref().map(compose);
            BoundSlot {
                wrapper_style: visual.as_ref().map(ResolvedVisual::wrapper_style),
                image_style: visual.as_ref().map(ResolvedVisual::image_style),
                visual,
                binding,
                debug,
            }
        })
        .collect();

    tracing::debug!(page = %page, debug = mode.is_active(), "bound page slots");
    Json(BindResponse {
        page,
        debug: mode.is_active(),
        slots,
    })
}
