//! # Composition Engine
//!
//! Derives the final render description of a slot from declarative
//! parameters. [`compose`] is a pure function of its [`CompositionSpec`] and
//! the static [registry](crate::registry): no I/O, no randomness, no hidden
//! state. Structurally equal specs serialize to byte-identical output.
//!
//! ## Axes
//!
//! | Axis | Effect |
//! |------|--------|
//! | `size` | image width/height from the size class |
//! | `rotation` | `rotate()` transform on the wrapper |
//! | `clip` | `clip-path` polygon on the image |
//! | `shadow` | `box-shadow` when unclipped, `drop-shadow` filter when clipped |
//! | `overlap` | negative margin on one edge, size-class pull |
//! | `bleed` | negative margin on one edge, named amount; beats overlap |
//! | `border` | border on the image |
//! | `decoration` | absolutely positioned markers, no layout effect |
//! | `frame` | padding and background around the image |
//! | `focal` | `object-position` from the authored hotspot |
//! | `debug` | outline and identifier badge |

mod style;

pub use style::{Declarations, inline_style};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::{
    BleedAmount, BorderStyle, ClipShape, Decoration, FrameStyle, MarkerKind, ShadowProfile, SizeClass,
};
use crate::store::Hotspot;

/// Stacking order for an unadorned slot.
pub const BASE_Z: i32 = 1;
/// Stacking order for a slot that bleeds off its container.
pub const BLEED_Z: i32 = 2;
/// Stacking order for a slot pulled over its neighbour.
pub const OVERLAP_Z: i32 = 3;
/// Stacking order for debug affordances.
pub const DEBUG_Z: i32 = 1000;

/// Outline drawn around slots in debug mode.
pub const DEBUG_OUTLINE: &str = "2px dashed #ff2d55";

/// One side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Edge::Top => "top",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
        })
    }
}

/// Per-edge values, in CSS order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Edges<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy> Edges<T> {
    pub fn get(&self, edge: Edge) -> T {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
        }
    }

    pub fn set(&mut self, edge: Edge, value: T) {
        match edge {
            Edge::Top => self.top = value,
            Edge::Right => self.right = value,
            Edge::Bottom => self.bottom = value,
            Edge::Left => self.left = value,
        }
    }
}

/// Declarative composition parameters for one slot.
///
/// Every field has a neutral default, so `{}` composes to a plain `md` box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompositionSpec {
    /// Identifier shown by debug affordances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
    pub size: SizeClass,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub clip: ClipShape,
    pub shadow: ShadowProfile,
    pub border: BorderStyle,
    /// Edge pulled toward the neighbouring slot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap: Option<Edge>,
    /// Edge pushed past the container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bleed: Option<Edge>,
    pub bleed_amount: BleedAmount,
    pub decoration: Decoration,
    pub frame: FrameStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal: Option<Hotspot>,
    pub debug: bool,
}

/// How the shadow is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShadowMode {
    /// Rectangular `box-shadow` on the wrapper.
    BoxShadow,
    /// `filter: drop-shadow()` on the wrapper, following the clip outline.
    DropShadow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedShadow {
    pub mode: ShadowMode,
    pub css: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFrame {
    pub padding: Edges<u32>,
    pub background: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
}

/// A decorative marker, positioned relative to the slot's outer box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub kind: MarkerKind,
    /// Percent of the outer width; the marker is centred on it.
    pub left: f32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    pub rotation: f32,
    pub z_index: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugAffordance {
    pub outline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub z_index: i32,
}

/// Fully resolved geometry and style for one slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVisual {
    /// Image box.
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: String,
    /// Image box plus frame padding.
    pub outer_width: u32,
    pub outer_height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ResolvedShadow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    pub margin: Edges<i32>,
    pub z_index: i32,
    pub object_position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<ResolvedFrame>,
    pub overlays: Vec<Overlay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugAffordance>,
}

impl ResolvedVisual {
    /// Canonical serialization, stable across calls for equal specs.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Round an angle to hundredths of a degree and fold it into (-180, 180].
/// Non-finite input means no rotation.
pub(crate) fn normalize_rotation(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let round = |d: f32| (d * 100.0).round() / 100.0;
    // Round before folding so values just past 180 cannot land on -180
    let mut d = round(degrees % 360.0);
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    let d = round(d);
    // -0.0 and 0.0 must serialize the same way
    if d == 0.0 { 0.0 } else { d }
}

fn percent(fraction: f64) -> String {
    let clamped = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.5
    };
    format!("{}%", (clamped * 1000.0).round() / 10.0)
}

/// Derive the render description for `spec`.
pub fn compose(spec: &CompositionSpec) -> ResolvedVisual {
    let size = spec.size.spec();
    let width = size.width;
    let height = size.height();

    // Margins: overlap first, then bleed overwrites its own edge.
    let mut margin = Edges::<i32>::default();
    if let Some(edge) = spec.overlap {
        margin.set(edge, -(size.overlap as i32));
    }
    let bleed_px = spec.bleed_amount.spec().px;
    let bleed_edge = spec.bleed.filter(|_| bleed_px > 0);
    if let Some(edge) = bleed_edge {
        margin.set(edge, -(bleed_px as i32));
    }
    let overlap_effective = spec.overlap.is_some_and(|edge| Some(edge) != bleed_edge);

    let z_index = if overlap_effective {
        OVERLAP_Z
    } else if bleed_edge.is_some() {
        BLEED_Z
    } else {
        BASE_Z
    };

    let rotation = normalize_rotation(spec.rotation);
    let transform = (rotation != 0.0).then(|| format!("rotate({}deg)", rotation));

    let clip_path = spec.clip.spec().polygon();
    let shadow_spec = spec.shadow.spec();
    let shadow = (!shadow_spec.is_none()).then(|| {
        if clip_path.is_some() {
            ResolvedShadow {
                mode: ShadowMode::DropShadow,
                css: shadow_spec.drop_shadow(),
            }
        } else {
            ResolvedShadow {
                mode: ShadowMode::BoxShadow,
                css: shadow_spec.box_shadow(),
            }
        }
    });

    let frame_spec = spec.frame.spec();
    let frame = (!frame_spec.is_none()).then(|| {
        let (top, right, bottom, left) = frame_spec.padding;
        ResolvedFrame {
            padding: Edges {
                top,
                right,
                bottom,
                left,
            },
            background: frame_spec.background.to_string(),
            border: frame_spec.border.map(str::to_string),
        }
    });
    let (outer_width, outer_height) = match &frame {
        Some(f) => (
            width + f.padding.left + f.padding.right,
            height + f.padding.top + f.padding.bottom,
        ),
        None => (width, height),
    };

    let overlays = spec
        .decoration
        .spec()
        .markers
        .iter()
        .map(|m| Overlay {
            kind: m.kind,
            left: m.left,
            top: m.top,
            width: m.width,
            height: m.height,
            rotation: m.rotation,
            z_index: z_index + 1,
        })
        .collect();

    let object_position = match spec.focal {
        Some(h) => format!("{} {}", percent(h.x), percent(h.y)),
        None => "50% 50%".to_string(),
    };

    let debug = spec.debug.then(|| DebugAffordance {
        outline: DEBUG_OUTLINE.to_string(),
        badge: spec.slot_id.clone(),
        z_index: DEBUG_Z,
    });

    let (aw, ah) = size.aspect;
    ResolvedVisual {
        width,
        height,
        aspect_ratio: format!("{} / {}", aw, ah),
        outer_width,
        outer_height,
        transform,
        clip_path,
        shadow,
        border: spec.border.spec().css(),
        margin,
        z_index,
        object_position,
        frame,
        overlays,
        debug,
    }
}
