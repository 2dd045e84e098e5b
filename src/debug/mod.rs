//! # Debug Overlay Protocol
//!
//! An opt-in, per-page-view mode for finding slot identifiers on a live page.
//!
//! ## States
//!
//! ```text
//!   navigation without ?debug-slots        navigation with ?debug-slots
//!            │                                         │
//!            ▼                                         ▼
//!       ┌──────────┐   (no in-page toggle)       ┌──────────┐
//!       │ Inactive │ ◄──── new navigation ─────► │  Active  │
//!       └──────────┘                             └──────────┘
//! ```
//!
//! While active, pointer enter/leave on a slot updates a single "hovered
//! slot" value, and clicking a slot copies its identifier, opens the
//! authoring tool on it, and suppresses the slot's own click behaviour.
//!
//! The hovered value lives in a [`DebugSession`], one per page view, behind
//! a `tokio::sync::watch` channel: subscribers get every change, dropping a
//! receiver unsubscribes, and [`DebugSession::navigate`] tears the whole
//! session down. There is no process-global hover state.

mod host;

pub use host::{Clipboard, EditorOpener, MemoryClipboard, RecordingOpener};

use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use crate::compose::{CompositionSpec, normalize_rotation};
use crate::config::StudioConfig;

/// Query parameter that turns the overlay on.
pub const DEBUG_QUERY_PARAM: &str = "debug-slots";

/// Overlay state for one page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugMode {
    #[default]
    Inactive,
    Active,
}

impl DebugMode {
    /// Derive the mode from a full URL or path with query string.
    pub fn from_url(url: &str) -> Self {
        let without_fragment = url.split('#').next().unwrap_or("");
        match without_fragment.split_once('?') {
            Some((_, query)) => Self::from_query(query),
            None => DebugMode::Inactive,
        }
    }

    /// Derive the mode from a raw query string (without the leading `?`).
    ///
    /// The flag only needs to be present: `?debug-slots`, `?debug-slots=1`
    /// and `?debug-slots=` all activate it.
    pub fn from_query(query: &str) -> Self {
        let present = query
            .trim_start_matches('?')
            .split('&')
            .any(|pair| pair.split('=').next() == Some(DEBUG_QUERY_PARAM));
        if present {
            DebugMode::Active
        } else {
            DebugMode::Inactive
        }
    }

    pub fn is_active(self) -> bool {
        self == DebugMode::Active
    }
}

/// What the slot's own click handler should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Overlay inactive: run the slot's normal behaviour.
    PassThrough,
    /// Overlay handled the click: suppress default behaviour and navigation.
    Intercepted {
        slot_id: String,
        editor_url: String,
        copied: bool,
        opened: bool,
    },
}

impl ClickOutcome {
    pub fn prevents_default(&self) -> bool {
        matches!(self, ClickOutcome::Intercepted { .. })
    }
}

/// Overlay state for a single page view.
pub struct DebugSession {
    view_id: Uuid,
    mode: DebugMode,
    hovered: watch::Sender<Option<String>>,
    studio: StudioConfig,
    clipboard: Arc<dyn Clipboard>,
    opener: Arc<dyn EditorOpener>,
}

impl DebugSession {
    /// Start a page view at `url`.
    pub fn new(
        url: &str,
        studio: StudioConfig,
        clipboard: Arc<dyn Clipboard>,
        opener: Arc<dyn EditorOpener>,
    ) -> Self {
        let (hovered, _) = watch::channel(None);
        let session = Self {
            view_id: Uuid::new_v4(),
            mode: DebugMode::from_url(url),
            hovered,
            studio,
            clipboard,
            opener,
        };
        tracing::debug!(view = %session.view_id, mode = ?session.mode, "page view started");
        session
    }

    /// End this page view and start a new one at `url`.
    ///
    /// Existing subscribers see their channel close.
    pub fn navigate(self, url: &str) -> Self {
        let Self {
            studio,
            clipboard,
            opener,
            ..
        } = self;
        Self::new(url, studio, clipboard, opener)
    }

    pub fn view_id(&self) -> Uuid {
        self.view_id
    }

    pub fn mode(&self) -> DebugMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode.is_active()
    }

    /// Currently hovered slot, if any.
    pub fn hovered(&self) -> Option<String> {
        self.hovered.borrow().clone()
    }

    /// Watch the hovered slot. Drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.hovered.subscribe()
    }

    /// Pointer entered `slot_id`. Replaces any previous hover in one step.
    pub fn pointer_enter(&self, slot_id: &str) {
        if !self.is_active() {
            return;
        }
        self.hovered.send_if_modified(|current| {
            if current.as_deref() == Some(slot_id) {
                return false;
            }
            *current = Some(slot_id.to_string());
            true
        });
    }

    /// Pointer left `slot_id`. Only clears the hover if it is still that slot.
    pub fn pointer_leave(&self, slot_id: &str) {
        if !self.is_active() {
            return;
        }
        self.hovered.send_if_modified(|current| {
            if current.as_deref() == Some(slot_id) {
                *current = None;
                true
            } else {
                false
            }
        });
    }

    /// Handle a click on `slot_id`.
    ///
    /// Host failures are logged; the click is still intercepted so the
    /// page never navigates away in debug mode.
    pub fn click(&self, slot_id: &str) -> ClickOutcome {
        if !self.is_active() {
            return ClickOutcome::PassThrough;
        }

        let copied = match self.clipboard.write_text(slot_id) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(slot_id, error = %e, "could not copy slot id");
                false
            }
        };

        let editor_url = self.studio.edit_url(slot_id);
        let opened = match self.opener.open(&editor_url) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(slot_id, error = %e, "could not open editor");
                false
            }
        };

        tracing::info!(view = %self.view_id, slot_id, copied, opened, "debug click");
        ClickOutcome::Intercepted {
            slot_id: slot_id.to_string(),
            editor_url,
            copied,
            opened,
        }
    }
}

/// Overlay label text: the identifier followed by its configuration.
pub fn describe(slot_id: &str, spec: &CompositionSpec) -> String {
    let mut lines = vec![slot_id.to_string()];

    let mut geometry = vec![
        format!("size: {}", spec.size),
        format!("clip: {}", spec.clip),
        format!("shadow: {}", spec.shadow),
    ];
    let rotation = normalize_rotation(spec.rotation);
    if rotation != 0.0 {
        geometry.push(format!("rotation: {}deg", rotation));
    }
    lines.push(geometry.join(" | "));

    let mut layout = Vec::new();
    if let Some(edge) = spec.overlap {
        layout.push(format!("overlap: {}", edge));
    }
    if let Some(edge) = spec.bleed {
        layout.push(format!("bleed: {} ({})", edge, spec.bleed_amount));
    }
    if spec.border != Default::default() {
        layout.push(format!("border: {}", spec.border));
    }
    if spec.frame != Default::default() {
        layout.push(format!("frame: {}", spec.frame));
    }
    if spec.decoration != Default::default() {
        layout.push(format!("decoration: {}", spec.decoration));
    }
    if !layout.is_empty() {
        lines.push(layout.join(" | "));
    }

    lines.join("\n")
}
