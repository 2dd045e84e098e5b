//! CSS rendering of a [`ResolvedVisual`].
//!
//! A slot renders as a wrapper (margins, transform, frame, shadow, stacking)
//! around an image box (size, clip, border, focal point), with overlays as
//! absolutely positioned siblings of the image inside the wrapper.

use super::{Edges, Overlay, ResolvedVisual, ShadowMode};

/// Ordered CSS declarations.
pub type Declarations = Vec<(&'static str, String)>;

/// Join declarations into a `style` attribute value.
pub fn inline_style(declarations: &[(&'static str, String)]) -> String {
    declarations
        .iter()
        .map(|(property, value)| format!("{}: {}", property, value))
        .collect::<Vec<_>>()
        .join("; ")
}

fn px(value: i32) -> String {
    if value == 0 { "0".to_string() } else { format!("{}px", value) }
}

fn edges_px<T: Copy + Into<i64>>(edges: &Edges<T>) -> String {
    let side = |v: T| {
        let v: i64 = v.into();
        px(v as i32)
    };
    format!(
        "{} {} {} {}",
        side(edges.top),
        side(edges.right),
        side(edges.bottom),
        side(edges.left)
    )
}

impl ResolvedVisual {
    /// Declarations for the outer wrapper element.
    pub fn wrapper_declarations(&self) -> Declarations {
        let mut out: Declarations = vec![
            ("position", "relative".into()),
            ("display", "inline-block".into()),
            ("width", px(self.outer_width as i32)),
            ("height", px(self.outer_height as i32)),
        ];
        if self.margin != Edges::default() {
            out.push(("margin", edges_px(&self.margin)));
        }
        out.push(("z-index", self.z_index.to_string()));
        if let Some(transform) = &self.transform {
            out.push(("transform", transform.clone()));
        }
        if let Some(frame) = &self.frame {
            out.push(("padding", edges_px(&frame.padding)));
            out.push(("background", frame.background.clone()));
            if let Some(border) = &frame.border {
                out.push(("border", border.clone()));
            }
            out.push(("box-sizing", "border-box".into()));
        }
        if let Some(shadow) = &self.shadow {
            match shadow.mode {
                ShadowMode::BoxShadow => out.push(("box-shadow", shadow.css.clone())),
                ShadowMode::DropShadow => out.push(("filter", shadow.css.clone())),
            }
        }
        if let Some(debug) = &self.debug {
            out.push(("outline", debug.outline.clone()));
            out.push(("cursor", "copy".into()));
        }
        out
    }

    /// Declarations for the image box.
    pub fn image_declarations(&self) -> Declarations {
        let mut out: Declarations = vec![
            ("display", "block".into()),
            ("width", px(self.width as i32)),
            ("height", px(self.height as i32)),
            ("aspect-ratio", self.aspect_ratio.clone()),
            ("object-fit", "cover".into()),
            ("object-position", self.object_position.clone()),
        ];
        if let Some(clip) = &self.clip_path {
            out.push(("clip-path", clip.clone()));
        }
        if let Some(border) = &self.border {
            out.push(("border", border.clone()));
        }
        out
    }

    /// `style` attribute of the wrapper.
    pub fn wrapper_style(&self) -> String {
        inline_style(&self.wrapper_declarations())
    }

    /// `style` attribute of the image.
    pub fn image_style(&self) -> String {
        inline_style(&self.image_declarations())
    }
}

impl Overlay {
    /// Declarations for one decorative marker.
    pub fn declarations(&self) -> Declarations {
        let mut transform = "translateX(-50%)".to_string();
        if self.rotation != 0.0 {
            transform.push_str(&format!(" rotate({}deg)", self.rotation));
        }
        vec![
            ("position", "absolute".into()),
            ("left", format!("{}%", self.left)),
            ("top", px(self.top)),
            ("width", px(self.width as i32)),
            ("height", px(self.height as i32)),
            ("transform", transform),
            ("z-index", self.z_index.to_string()),
            ("pointer-events", "none".into()),
        ]
    }
}
