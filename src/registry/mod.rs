//! # Shape/Style Registry
//!
//! Frozen lookup tables mapping symbolic style names to concrete geometry.
//! Everything here is `static` data: nothing is computed or allocated at
//! startup, and nothing can be changed at runtime.
//!
//! Each table is exposed as a typed enum whose serde names are the symbolic
//! names used by layout code (`"torn-top"`, `"polaroid"`, ...).
//!
//! ```
//! use vitrine::registry::{ClipShape, SizeClass};
//!
//! let md = SizeClass::Md.spec();
//! assert_eq!((md.width, md.height()), (320, 400));
//! assert_eq!(ClipShape::by_name("diamond"), Some(ClipShape::Diamond));
//! ```

use serde::{Deserialize, Serialize};

/// Declare a registry enum together with its static table.
///
/// Table rows are stored in declaration order, so `variant as usize` is the
/// row index.
macro_rules! registry {
    (
        $(#[$meta:meta])*
        pub enum $name:ident: $spec:ty = $table:ident, default $default:ident {
            $( $variant:ident = $key:literal => $value:expr, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $( #[serde(rename = $key)] $variant, )+
        }

        static $table: &[$spec] = &[ $( $value, )+ ];

        impl $name {
            /// Every entry, in table order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Symbolic name.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $key, )+
                }
            }

            /// Concrete values for this entry.
            pub fn spec(self) -> &'static $spec {
                &$table[self as usize]
            }

            /// Look up an entry by symbolic name.
            pub fn by_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|entry| entry.name() == name)
            }

            /// All symbolic names, in table order.
            pub fn names() -> Vec<&'static str> {
                Self::ALL.iter().map(|entry| entry.name()).collect()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::by_name(s).ok_or_else(|| {
                    format!(
                        "unknown {} '{}' (expected one of: {})",
                        stringify!($name),
                        s,
                        Self::names().join(", ")
                    )
                })
            }
        }
    };
}

// ============================================================================
// SIZE CLASSES
// ============================================================================

/// Fixed image box for a size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSpec {
    /// Image width in px.
    pub width: u32,
    /// Aspect ratio as (width, height).
    pub aspect: (u32, u32),
    /// Pull applied to the neighbouring edge when overlapping.
    pub overlap: u32,
}

impl SizeSpec {
    const fn new(width: u32, aspect: (u32, u32), overlap: u32) -> Self {
        Self {
            width,
            aspect,
            overlap,
        }
    }

    /// Image height in px, derived from width and aspect ratio.
    pub fn height(&self) -> u32 {
        let (w, h) = self.aspect;
        ((self.width as u64 * h as u64 + w as u64 / 2) / w as u64) as u32
    }
}

registry! {
    /// Discrete image size.
    pub enum SizeClass: SizeSpec = SIZES, default Md {
        Xs = "xs" => SizeSpec::new(160, (3, 4), 16),
        Sm = "sm" => SizeSpec::new(240, (3, 4), 24),
        Md = "md" => SizeSpec::new(320, (4, 5), 32),
        Lg = "lg" => SizeSpec::new(440, (4, 5), 48),
        Xl = "xl" => SizeSpec::new(560, (2, 3), 56),
        Square = "square" => SizeSpec::new(360, (1, 1), 36),
        Wide = "wide" => SizeSpec::new(720, (3, 2), 64),
        Hero = "hero" => SizeSpec::new(960, (16, 9), 80),
    }
}

// ============================================================================
// CLIP SHAPES
// ============================================================================

/// Clip polygon, points in percent of the image box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipSpec {
    pub points: &'static [(f32, f32)],
}

impl ClipSpec {
    pub fn is_none(&self) -> bool {
        self.points.is_empty()
    }

    /// CSS `polygon(...)`, or `None` for the unclipped shape.
    pub fn polygon(&self) -> Option<String> {
        if self.is_none() {
            return None;
        }
        let points: Vec<String> = self
            .points
            .iter()
            .map(|(x, y)| format!("{}% {}%", x, y))
            .collect();
        Some(format!("polygon({})", points.join(", ")))
    }
}

registry! {
    /// Named clip-path polygon.
    pub enum ClipShape: ClipSpec = CLIPS, default None {
        None = "none" => ClipSpec { points: &[] },
        TornTop = "torn-top" => ClipSpec {
            points: &[
                (0.0, 4.0), (8.0, 0.0), (17.0, 3.0), (26.0, 1.0), (38.0, 4.0), (49.0, 0.0),
                (61.0, 3.0), (72.0, 1.0), (84.0, 4.0), (93.0, 0.0), (100.0, 3.0),
                (100.0, 100.0), (0.0, 100.0),
            ],
        },
        TornBottom = "torn-bottom" => ClipSpec {
            points: &[
                (0.0, 0.0), (100.0, 0.0), (100.0, 97.0), (93.0, 100.0), (84.0, 96.0),
                (72.0, 99.0), (61.0, 97.0), (49.0, 100.0), (38.0, 96.0), (26.0, 99.0),
                (17.0, 97.0), (8.0, 100.0), (0.0, 96.0),
            ],
        },
        SlantLeft = "slant-left" => ClipSpec {
            points: &[(8.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)],
        },
        SlantRight = "slant-right" => ClipSpec {
            points: &[(0.0, 0.0), (92.0, 0.0), (100.0, 100.0), (0.0, 100.0)],
        },
        Notch = "notch" => ClipSpec {
            points: &[(0.0, 0.0), (100.0, 0.0), (100.0, 85.0), (85.0, 100.0), (0.0, 100.0)],
        },
        Wave = "wave" => ClipSpec {
            points: &[
                (0.0, 0.0), (100.0, 0.0), (100.0, 94.0), (87.5, 98.0), (75.0, 100.0),
                (62.5, 98.0), (50.0, 94.0), (37.5, 90.0), (25.0, 88.0), (12.5, 90.0),
                (0.0, 94.0),
            ],
        },
        Diamond = "diamond" => ClipSpec {
            points: &[(50.0, 0.0), (100.0, 50.0), (50.0, 100.0), (0.0, 50.0)],
        },
    }
}

// ============================================================================
// SHADOWS
// ============================================================================

/// Shadow geometry. Colour is black at `opacity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSpec {
    pub x: i32,
    pub y: i32,
    pub blur: u32,
    pub spread: i32,
    pub opacity: f32,
}

impl ShadowSpec {
    const fn new(x: i32, y: i32, blur: u32, spread: i32, opacity: f32) -> Self {
        Self {
            x,
            y,
            blur,
            spread,
            opacity,
        }
    }

    pub fn is_none(&self) -> bool {
        self.opacity <= 0.0
    }

    fn color(&self) -> String {
        format!("rgba(0, 0, 0, {})", self.opacity)
    }

    /// Rectangular `box-shadow` value.
    pub fn box_shadow(&self) -> String {
        format!(
            "{}px {}px {}px {}px {}",
            self.x,
            self.y,
            self.blur,
            self.spread,
            self.color()
        )
    }

    /// `filter` value that follows a clipped outline. Spread is not
    /// expressible there and is dropped.
    pub fn drop_shadow(&self) -> String {
        format!(
            "drop-shadow({}px {}px {}px {})",
            self.x,
            self.y,
            self.blur / 2,
            self.color()
        )
    }
}

registry! {
    /// Named shadow profile.
    pub enum ShadowProfile: ShadowSpec = SHADOWS, default None {
        None = "none" => ShadowSpec::new(0, 0, 0, 0, 0.0),
        Soft = "soft" => ShadowSpec::new(0, 4, 12, 0, 0.12),
        Hard = "hard" => ShadowSpec::new(6, 6, 0, 0, 0.85),
        Lifted = "lifted" => ShadowSpec::new(0, 18, 32, -8, 0.28),
        Deep = "deep" => ShadowSpec::new(0, 28, 60, -12, 0.4),
    }
}

// ============================================================================
// BORDERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderSpec {
    pub width: u32,
    pub line: &'static str,
    pub color: &'static str,
}

impl BorderSpec {
    pub fn css(&self) -> Option<String> {
        if self.width == 0 {
            return None;
        }
        Some(format!("{}px {} {}", self.width, self.line, self.color))
    }
}

registry! {
    /// Border drawn around the image box.
    pub enum BorderStyle: BorderSpec = BORDERS, default None {
        None = "none" => BorderSpec { width: 0, line: "none", color: "transparent" },
        Hairline = "hairline" => BorderSpec { width: 1, line: "solid", color: "rgba(0, 0, 0, 0.12)" },
        Thin = "thin" => BorderSpec { width: 2, line: "solid", color: "#111111" },
        Thick = "thick" => BorderSpec { width: 6, line: "solid", color: "#111111" },
        Dashed = "dashed" => BorderSpec { width: 2, line: "dashed", color: "#111111" },
        Double = "double" => BorderSpec { width: 4, line: "double", color: "#111111" },
    }
}

// ============================================================================
// BLEED
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BleedSpec {
    pub px: u32,
}

registry! {
    /// How far a bleeding slot pushes past its container edge.
    pub enum BleedAmount: BleedSpec = BLEEDS, default Md {
        None = "none" => BleedSpec { px: 0 },
        Sm = "sm" => BleedSpec { px: 16 },
        Md = "md" => BleedSpec { px: 32 },
        Lg = "lg" => BleedSpec { px: 64 },
        Xl = "xl" => BleedSpec { px: 96 },
    }
}

// ============================================================================
// FRAMES
// ============================================================================

/// Cosmetic wrapper around the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSpec {
    /// Padding as (top, right, bottom, left) px.
    pub padding: (u32, u32, u32, u32),
    pub background: &'static str,
    pub border: Option<&'static str>,
}

impl FrameSpec {
    pub fn is_none(&self) -> bool {
        self.padding == (0, 0, 0, 0) && self.border.is_none()
    }
}

registry! {
    /// Named frame treatment.
    pub enum FrameStyle: FrameSpec = FRAMES, default None {
        None = "none" => FrameSpec { padding: (0, 0, 0, 0), background: "transparent", border: None },
        Polaroid = "polaroid" => FrameSpec {
            padding: (12, 12, 48, 12),
            background: "#fdfdf8",
            border: Some("1px solid rgba(0, 0, 0, 0.08)"),
        },
        Film = "film" => FrameSpec { padding: (24, 8, 24, 8), background: "#111111", border: None },
        Gallery = "gallery" => FrameSpec {
            padding: (20, 20, 20, 20),
            background: "#ffffff",
            border: Some("1px solid #dddddd"),
        },
        Mat = "mat" => FrameSpec {
            padding: (40, 40, 40, 40),
            background: "#f4f1ea",
            border: Some("8px solid #2b2b2b"),
        },
    }
}

// ============================================================================
// DECORATIONS
// ============================================================================

/// Kind of cosmetic marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    Tape,
    Pin,
    Staple,
}

/// One marker placed over the slot box.
///
/// `left` is a percentage of the box width (marker centred on it); `top` is
/// px from the box's top edge and may be negative to overhang.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub left: f32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    pub rotation: f32,
}

impl Marker {
    const fn new(kind: MarkerKind, left: f32, top: i32, size: (u32, u32), rotation: f32) -> Self {
        Self {
            kind,
            left,
            top,
            width: size.0,
            height: size.1,
            rotation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorationSpec {
    pub markers: &'static [Marker],
}

registry! {
    /// Decorative overlay set.
    pub enum Decoration: DecorationSpec = DECORATIONS, default None {
        None = "none" => DecorationSpec { markers: &[] },
        Tape = "tape" => DecorationSpec {
            markers: &[Marker::new(MarkerKind::Tape, 50.0, -14, (96, 28), -3.0)],
        },
        TapeCorners = "tape-corners" => DecorationSpec {
            markers: &[
                Marker::new(MarkerKind::Tape, 6.0, -10, (72, 24), -40.0),
                Marker::new(MarkerKind::Tape, 94.0, -10, (72, 24), 40.0),
            ],
        },
        Pin = "pin" => DecorationSpec {
            markers: &[Marker::new(MarkerKind::Pin, 50.0, -6, (14, 14), 0.0)],
        },
        Staple = "staple" => DecorationSpec {
            markers: &[Marker::new(MarkerKind::Staple, 50.0, -4, (36, 8), 2.0)],
        },
    }
}

/// Names of every table, for listing endpoints and CLI help.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryListing {
    pub sizes: Vec<&'static str>,
    pub clips: Vec<&'static str>,
    pub shadows: Vec<&'static str>,
    pub borders: Vec<&'static str>,
    pub bleeds: Vec<&'static str>,
    pub frames: Vec<&'static str>,
    pub decorations: Vec<&'static str>,
}

/// List every registered name.
pub fn listing() -> RegistryListing {
    RegistryListing {
        sizes: SizeClass::names(),
        clips: ClipShape::names(),
        shadows: ShadowProfile::names(),
        borders: BorderStyle::names(),
        bleeds: BleedAmount::names(),
        frames: FrameStyle::names(),
        decorations: Decoration::names(),
    }
}
