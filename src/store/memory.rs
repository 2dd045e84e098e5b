//! In-process backend with the same query semantics as the hosted store.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ContentStore, SlotQuery, SlotRecord, records_from_result};
use crate::error::VitrineError;

/// Records held in memory.
///
/// Filters inactive records, orders by `order` then `slot_id`, and applies
/// the single-slot limit, like the hosted query. Counts fetches and can be
/// switched into a failing mode to exercise the resolver's fallbacks.
#[derive(Default)]
pub struct MemoryContentStore {
    records: RwLock<Vec<SlotRecord>>,
    fetches: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryContentStore {
    pub fn new(records: Vec<SlotRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            ..Default::default()
        }
    }

    /// Load records from a JSON file holding an array of slot records (or a
    /// query response object with a `result` member).
    pub fn from_json_file(path: &Path) -> Result<Self, VitrineError> {
        let text = std::fs::read_to_string(path)?;
        let mut value: serde_json::Value = serde_json::from_str(&text)?;
        if let Some(result) = value.get_mut("result") {
            value = result.take();
        }
        Ok(Self::new(records_from_result(value)?))
    }

    /// Swap the stored records, as if authors had edited them.
    pub async fn replace(&self, records: Vec<SlotRecord>) {
        *self.records.write().await = records;
    }

    /// Make subsequent fetches fail with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetches attempted, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn fetch(&self, query: &SlotQuery) -> Result<Vec<SlotRecord>, VitrineError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(VitrineError::Transport("content store unavailable".into()));
        }

        let records = self.records.read().await;
        let mut matched: Vec<SlotRecord> = records
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.slot_id.cmp(&b.slot_id)));
        if let Some(limit) = query.limit() {
            matched.truncate(limit);
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryContentStore {
        let mut hidden = SlotRecord::new("home-hero-009", "home", "hero");
        hidden.is_active = false;
        MemoryContentStore::new(vec![
            SlotRecord::new("home-hero-002", "home", "hero").with_order(2),
            SlotRecord::new("home-hero-001", "home", "hero").with_order(1),
            SlotRecord::new("home-grid-001", "home", "grid").with_order(1),
            SlotRecord::new("archive-header-002", "archive", "header"),
            hidden,
        ])
    }

    fn ids(records: &[SlotRecord]) -> Vec<&str> {
        records.iter().map(|r| r.slot_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_by_page_orders_and_filters() {
        let store = store();
        let records = store
            .fetch(&SlotQuery::ByPage { page: "home".into() })
            .await
            .unwrap();
        assert_eq!(ids(&records), vec!["home-grid-001", "home-hero-001", "home-hero-002"]);
    }

    #[tokio::test]
    async fn test_by_section() {
        let store = store();
        let records = store
            .fetch(&SlotQuery::BySection {
                page: "home".into(),
                section: "hero".into(),
            })
            .await
            .unwrap();
        assert_eq!(ids(&records), vec!["home-hero-001", "home-hero-002"]);
    }

    #[tokio::test]
    async fn test_one_and_ids() {
        let store = store();
        let one = store
            .fetch(&SlotQuery::One {
                slot_id: "home-hero-009".into(),
            })
            .await
            .unwrap();
        assert!(one.is_empty(), "inactive records are never returned");

        let some = store
            .fetch(&SlotQuery::ByIds {
                slot_ids: vec!["archive-header-002".into(), "missing-x-001".into()],
            })
            .await
            .unwrap();
        assert_eq!(ids(&some), vec!["archive-header-002"]);
    }

    #[tokio::test]
    async fn test_failing_mode_and_counter() {
        let store = store();
        store.set_failing(true);
        let err = store
            .fetch(&SlotQuery::ByPage { page: "home".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, VitrineError::Transport(_)));
        assert_eq!(store.fetch_count(), 1);
    }
}
