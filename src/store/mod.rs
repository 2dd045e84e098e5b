//! # Content Store
//!
//! Read-only access to authored slot records.
//!
//! A [`SlotQuery`] describes one of the four lookups the resolver needs. It
//! renders itself to a query string in the store's query language plus a
//! parameter object, which together form the cache key. Backends implement
//! [`ContentStore`]:
//!
//! - [`HttpContentStore`]: the hosted content API over HTTPS.
//! - [`MemoryContentStore`]: in-process records with the same filtering and
//!   ordering, for tests and fixture-driven runs.

mod http;
mod memory;

pub use http::HttpContentStore;
pub use memory::MemoryContentStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::{QueryParams, params};
use crate::error::VitrineError;

/// Document kind holding slot bindings in the content store.
pub const SLOT_DOCUMENT_TYPE: &str = "slotImage";

/// Fields projected out of every slot document.
const PROJECTION: &str = r#"{
  slotId,
  page,
  section,
  description,
  label,
  order,
  isActive,
  "imageUrl": image.asset->url,
  "imageAlt": image.alt,
  "imageLqip": image.asset->metadata.lqip,
  "imageWidth": image.asset->metadata.dimensions.width,
  "imageHeight": image.asset->metadata.dimensions.height,
  "imageHotspot": image.hotspot
}"#;

/// Authored focal point, as fractions of the image (0.0..=1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

fn default_true() -> bool {
    true
}

/// One content-authored image binding.
///
/// `slot_id` has the form `<page>-<section>-<NNN>`. Records are created in
/// the authoring tool and are read-only here. A record without an image is
/// valid; it renders as a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    pub slot_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub section: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_true", deserialize_with = "deserialize_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_lqip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_hotspot: Option<Hotspot>,
}

/// `isActive` is projected as `null` on documents that never set it.
fn deserialize_active<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Unset attributes are projected as `null`, not omitted.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SlotRecord {
    /// A bare record with no image bound.
    pub fn new(slot_id: impl Into<String>, page: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            slot_id: slot_id.into(),
            page: page.into(),
            section: section.into(),
            order: 0,
            label: None,
            description: None,
            is_active: true,
            image_url: None,
            image_alt: None,
            image_lqip: None,
            image_width: None,
            image_height: None,
            image_hotspot: None,
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// The lookups the resolver issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotQuery {
    /// Every active slot on a page.
    ByPage { page: String },
    /// Active slots of one section of a page.
    BySection { page: String, section: String },
    /// A single slot by identifier.
    One { slot_id: String },
    /// An explicit list of identifiers.
    ByIds { slot_ids: Vec<String> },
}

impl SlotQuery {
    /// Query string in the store's query language.
    pub fn query(&self) -> String {
        let filter = match self {
            SlotQuery::ByPage { .. } => "page == $page",
            SlotQuery::BySection { .. } => "page == $page && section == $section",
            SlotQuery::One { .. } => "slotId == $slotId",
            SlotQuery::ByIds { .. } => "slotId in $slotIds",
        };
        let slice = match self {
            SlotQuery::One { .. } => "[0...1]",
            _ => "",
        };
        format!(
            "*[_type == \"{}\" && isActive != false && {}] | order(order asc, slotId asc){} {}",
            SLOT_DOCUMENT_TYPE, filter, slice, PROJECTION
        )
    }

    /// Named parameters referenced by [`query`](Self::query).
    pub fn params(&self) -> QueryParams {
        match self {
            SlotQuery::ByPage { page } => params([("page", page)]),
            SlotQuery::BySection { page, section } => params([("page", page), ("section", section)]),
            SlotQuery::One { slot_id } => params([("slotId", slot_id)]),
            SlotQuery::ByIds { slot_ids } => params([("slotIds", slot_ids)]),
        }
    }

    /// Whether `record` satisfies this query's filter.
    pub fn matches(&self, record: &SlotRecord) -> bool {
        if !record.is_active {
            return false;
        }
        match self {
            SlotQuery::ByPage { page } => record.page == *page,
            SlotQuery::BySection { page, section } => record.page == *page && record.section == *section,
            SlotQuery::One { slot_id } => record.slot_id == *slot_id,
            SlotQuery::ByIds { slot_ids } => slot_ids.contains(&record.slot_id),
        }
    }

    /// Maximum number of records this query may return.
    pub fn limit(&self) -> Option<usize> {
        match self {
            SlotQuery::One { .. } => Some(1),
            _ => None,
        }
    }
}

/// A source of slot records.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Run one query. Transport and decode failures are errors; no match is
    /// an empty vec.
    async fn fetch(&self, query: &SlotQuery) -> Result<Vec<SlotRecord>, VitrineError>;
}

/// Interpret the `result` member of a query response.
///
/// Array queries return a list, slice-to-one queries may come back as a
/// single object, and no match can be `null`.
pub(crate) fn records_from_result(result: Value) -> Result<Vec<SlotRecord>, VitrineError> {
    match result {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                serde_json::from_value(v)
                    .map_err(|e| VitrineError::Decode(format!("result[{}]: {}", i, e)))
            })
            .collect(),
        obj @ Value::Object(_) => Ok(vec![serde_json::from_value(obj)?]),
        other => Err(VitrineError::Decode(format!(
            "expected array, object or null result, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_projection() {
        let record: SlotRecord = serde_json::from_value(json!({
            "slotId": "home-hero-001",
            "page": "home",
            "section": "hero",
            "order": 1,
            "label": null,
            "description": "Opening look",
            "isActive": null,
            "imageUrl": "https://cdn.example.com/a.jpg",
            "imageAlt": null,
            "imageLqip": "data:image/jpeg;base64,AAAA",
            "imageWidth": 1200,
            "imageHeight": 1600,
            "imageHotspot": {"x": 0.5, "y": 0.3}
        }))
        .unwrap();
        assert_eq!(record.slot_id, "home-hero-001");
        assert!(record.is_active);
        assert!(record.has_image());
        assert_eq!(record.image_width, Some(1200));
        assert_eq!(record.image_hotspot.map(|h| h.y), Some(0.3));
    }

    #[test]
    fn test_record_without_image_is_valid() {
        let record: SlotRecord =
            serde_json::from_value(json!({"slotId": "about-team-003", "page": "about"})).unwrap();
        assert!(!record.has_image());
        assert_eq!(record.section, "");
    }

    #[test]
    fn test_null_attributes_fall_back_to_defaults() {
        let records = records_from_result(json!([
            {"slotId": "home-hero-001", "page": "home", "section": "hero", "order": 1},
            {"slotId": "home-hero-002", "page": "home", "section": null, "order": null},
            {"slotId": "home-hero-003", "page": null}
        ]))
        .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].order, 0);
        assert_eq!(records[1].section, "");
        assert_eq!(records[2].page, "");
    }

    #[test]
    fn test_query_strings_filter_and_order() {
        let q = SlotQuery::BySection {
            page: "home".into(),
            section: "hero".into(),
        };
        let text = q.query();
        assert!(text.starts_with("*[_type == \"slotImage\" && isActive != false && page == $page && section == $section]"));
        assert!(text.contains("order(order asc, slotId asc)"));
        assert!(text.contains("\"imageLqip\": image.asset->metadata.lqip"));

        let one = SlotQuery::One {
            slot_id: "home-hero-001".into(),
        };
        assert!(one.query().contains("[0...1]"));
    }

    #[test]
    fn test_params() {
        let q = SlotQuery::ByIds {
            slot_ids: vec!["a-b-001".into(), "a-b-002".into()],
        };
        assert_eq!(q.params()["slotIds"], json!(["a-b-001", "a-b-002"]));

        let q = SlotQuery::BySection {
            page: "home".into(),
            section: "hero".into(),
        };
        let names: Vec<_> = q.params().keys().cloned().collect();
        assert_eq!(names, vec!["page", "section"]);
    }

    #[test]
    fn test_matches_excludes_inactive() {
        let mut record = SlotRecord::new("home-hero-001", "home", "hero");
        let q = SlotQuery::ByPage { page: "home".into() };
        assert!(q.matches(&record));
        record.is_active = false;
        assert!(!q.matches(&record));
    }

    #[test]
    fn test_records_from_result_shapes() {
        assert!(records_from_result(Value::Null).unwrap().is_empty());
        assert_eq!(
            records_from_result(json!({"slotId": "x-y-001"})).unwrap().len(),
            1
        );
        assert_eq!(
            records_from_result(json!([{"slotId": "x-y-001"}, {"slotId": "x-y-002"}]))
                .unwrap()
                .len(),
            2
        );
        assert!(matches!(
            records_from_result(json!("nope")),
            Err(VitrineError::Decode(_))
        ));
        assert!(matches!(
            records_from_result(json!([{"page": "missing-id"}])),
            Err(VitrineError::Decode(_))
        ));
    }
}
