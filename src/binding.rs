//! # Slot Binding
//!
//! Turns a resolved slot map and a requested slot id into the exact prop
//! bundle a layout renders with. A missing slot is the normal case, not an
//! error: the bundle then carries only the id and the fallback label, and
//! the consumer draws a label placeholder.

use serde::Serialize;

use crate::resolver::SlotImageMap;
use crate::store::Hotspot;

/// Props for one rendered slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotBinding {
    pub slot_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotspot: Option<Hotspot>,
}

impl SlotBinding {
    /// True when there is no image to show and the label placeholder applies.
    pub fn is_placeholder(&self) -> bool {
        self.src.is_none()
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Bind `slot_id` against `slots`.
///
/// - Absent: `{ slot_id, label: default_label }` and nothing else. The label
///   is passed through verbatim, empty strings included.
/// - Present: `alt` is the first non-empty of image alt, description and
///   `default_label`; `label` prefers the authored override.
///
/// Total over all inputs.
pub fn bind(slots: &SlotImageMap, slot_id: &str, default_label: Option<&str>) -> SlotBinding {
    let Some(record) = slots.get(slot_id) else {
        return SlotBinding {
            slot_id: slot_id.to_string(),
            label: default_label.map(str::to_string),
            ..Default::default()
        };
    };

    let alt = non_empty(record.image_alt.as_deref())
        .or_else(|| non_empty(record.description.as_deref()))
        .or_else(|| non_empty(default_label));
    let label = non_empty(record.label.as_deref()).or(default_label);

    SlotBinding {
        slot_id: slot_id.to_string(),
        src: non_empty(record.image_url.as_deref()).map(str::to_string),
        alt: alt.map(str::to_string),
        label: label.map(str::to_string),
        blur_placeholder: non_empty(record.image_lqip.as_deref()).map(str::to_string),
        width: record.image_width,
        height: record.image_height,
        hotspot: record.image_hotspot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SlotRecord;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(records: Vec<SlotRecord>) -> SlotImageMap {
        SlotImageMap::from_records(records)
    }

    #[test]
    fn test_missing_slot_is_label_only() {
        let bound = bind(&SlotImageMap::default(), "home-hero-001", Some("LOOK 01"));
        assert_eq!(
            serde_json::to_value(&bound).unwrap(),
            json!({"slotId": "home-hero-001", "label": "LOOK 01"})
        );
        assert!(bound.is_placeholder());
    }

    #[test]
    fn test_missing_slot_with_empty_strings() {
        let bound = bind(&SlotImageMap::default(), "", Some(""));
        assert_eq!(
            bound,
            SlotBinding {
                slot_id: String::new(),
                label: Some(String::new()),
                ..Default::default()
            }
        );

        let bound = bind(&SlotImageMap::default(), "x", None);
        assert_eq!(serde_json::to_value(&bound).unwrap(), json!({"slotId": "x"}));
    }

    #[test]
    fn test_alt_falls_back_to_default_label() {
        let mut record = SlotRecord::new("home-hero-001", "home", "hero").with_image("https://cdn/a.jpg");
        record.image_alt = Some(String::new());
        record.description = Some(String::new());
        let bound = bind(&map(vec![record]), "home-hero-001", Some("LOOK 01"));
        assert_eq!(bound.src.as_deref(), Some("https://cdn/a.jpg"));
        assert_eq!(bound.alt.as_deref(), Some("LOOK 01"));
    }

    #[test]
    fn test_alt_priority() {
        let mut record = SlotRecord::new("home-hero-001", "home", "hero").with_image("https://cdn/a.jpg");
        record.description = Some("Authoring note".into());
        let bound = bind(&map(vec![record.clone()]), "home-hero-001", Some("LOOK 01"));
        assert_eq!(bound.alt.as_deref(), Some("Authoring note"));

        record.image_alt = Some("Model in a wool coat".into());
        let bound = bind(&map(vec![record]), "home-hero-001", Some("LOOK 01"));
        assert_eq!(bound.alt.as_deref(), Some("Model in a wool coat"));
    }

    #[test]
    fn test_label_override_and_media_fields() {
        let mut record = SlotRecord::new("archive-header-002", "archive", "header").with_image("https://cdn/b.jpg");
        record.label = Some("ARCHIVE".into());
        record.image_lqip = Some("data:image/jpeg;base64,AAAA".into());
        record.image_width = Some(800);
        record.image_height = Some(1000);

        let bound = bind(&map(vec![record]), "archive-header-002", Some("fallback"));
        assert_eq!(bound.label.as_deref(), Some("ARCHIVE"));
        assert_eq!(bound.blur_placeholder.as_deref(), Some("data:image/jpeg;base64,AAAA"));
        assert_eq!((bound.width, bound.height), (Some(800), Some(1000)));
        assert!(!bound.is_placeholder());
    }

    #[test]
    fn test_record_without_image_is_placeholder() {
        let record = SlotRecord::new("about-team-003", "about", "team");
        let bound = bind(&map(vec![record]), "about-team-003", Some("TEAM"));
        assert!(bound.is_placeholder());
        assert_eq!(bound.label.as_deref(), Some("TEAM"));
        assert_eq!(bound.alt.as_deref(), Some("TEAM"));
    }
}
