//! # Slot Resolver
//!
//! Maps page, section and identifier lookups to slot records, going through
//! the shared [`QueryCache`]. Every lookup is one store query; a fresh cache
//! entry means no store call at all.
//!
//! Resolution never fails from the caller's point of view. A transport or
//! decode error is logged and turned into an empty result, so the page
//! renders placeholders instead of an error.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;

use crate::binding::{SlotBinding, bind};
use crate::cache::{CacheKey, QueryCache};
use crate::store::{ContentStore, SlotQuery, SlotRecord};

/// Slot records keyed by `slot_id`, for one page or one id-list query.
///
/// Built fresh from a store result and read-only afterwards. Iteration is
/// ordered by slot id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SlotImageMap(BTreeMap<String, SlotRecord>);

impl SlotImageMap {
    /// Key a record list by slot id. On duplicate ids the later record wins.
    pub fn from_records(records: impl IntoIterator<Item = SlotRecord>) -> Self {
        let mut map = BTreeMap::new();
        for record in records {
            map.insert(record.slot_id.clone(), record);
        }
        Self(map)
    }

    pub fn get(&self, slot_id: &str) -> Option<&SlotRecord> {
        self.0.get(slot_id)
    }

    pub fn contains(&self, slot_id: &str) -> bool {
        self.0.contains_key(slot_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn slot_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &SlotRecord> {
        self.0.values()
    }
}

impl FromIterator<SlotRecord> for SlotImageMap {
    fn from_iter<I: IntoIterator<Item = SlotRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

/// The per-page handle given to layout code: the resolved map plus a binder
/// closed over it.
#[derive(Debug, Clone, Serialize)]
pub struct PageSlots {
    pub page: String,
    pub slots: SlotImageMap,
}

impl PageSlots {
    /// Bind one visual slot, falling back to a label placeholder.
    pub fn bind(&self, slot_id: &str, default_label: Option<&str>) -> SlotBinding {
        bind(&self.slots, slot_id, default_label)
    }

    /// A closure form of [`bind`](Self::bind) for callers that want a plain function.
    pub fn binder(&self) -> impl Fn(&str, Option<&str>) -> SlotBinding + '_ {
        move |slot_id: &str, default_label: Option<&str>| self.bind(slot_id, default_label)
    }
}

/// Cached slot lookups against a content store.
#[derive(Clone)]
pub struct SlotResolver {
    store: Arc<dyn ContentStore>,
    cache: Arc<QueryCache<Vec<SlotRecord>>>,
}

impl SlotResolver {
    /// Resolve through `cache`, treating entries older than the cache's
    /// TTL as stale. Reads and the background sweep share that one window.
    pub fn new(store: Arc<dyn ContentStore>, cache: Arc<QueryCache<Vec<SlotRecord>>>) -> Self {
        Self { store, cache }
    }

    pub fn cache(&self) -> &Arc<QueryCache<Vec<SlotRecord>>> {
        &self.cache
    }

    /// All active slots on `page`. Empty on failure.
    pub async fn resolve_by_page(&self, page: &str) -> SlotImageMap {
        let query = SlotQuery::ByPage { page: page.into() };
        self.run(&query)
            .await
            .map(SlotImageMap::from_records)
            .unwrap_or_default()
    }

    /// One slot by identifier. `None` when absent or on failure.
    pub async fn resolve_one(&self, slot_id: &str) -> Option<SlotRecord> {
        let query = SlotQuery::One {
            slot_id: slot_id.into(),
        };
        self.run(&query).await?.into_iter().next()
    }

    /// Active slots of one section, in authored order. Empty on failure.
    pub async fn resolve_by_section(&self, page: &str, section: &str) -> Vec<SlotRecord> {
        let query = SlotQuery::BySection {
            page: page.into(),
            section: section.into(),
        };
        self.run(&query).await.unwrap_or_default()
    }

    /// An explicit list of slots. Empty on failure; no query for an empty list.
    pub async fn resolve_by_ids(&self, slot_ids: &[&str]) -> SlotImageMap {
        if slot_ids.is_empty() {
            return SlotImageMap::default();
        }
        let query = SlotQuery::ByIds {
            slot_ids: slot_ids.iter().map(|s| s.to_string()).collect(),
        };
        self.run(&query)
            .await
            .map(SlotImageMap::from_records)
            .unwrap_or_default()
    }

    /// Resolve a page and hand back its binder.
    pub async fn page_slots(&self, page: &str) -> PageSlots {
        PageSlots {
            page: page.to_string(),
            slots: self.resolve_by_page(page).await,
        }
    }

    /// Resolve several pages concurrently. Results keep the input order.
    pub async fn resolve_pages(&self, pages: &[&str]) -> Vec<PageSlots> {
        join_all(pages.iter().map(|page| self.page_slots(page))).await
    }

    async fn run(&self, query: &SlotQuery) -> Option<Vec<SlotRecord>> {
        let key = CacheKey::new(&query.query(), &query.params());
        match self
            .cache
            .get_or_fetch(key, self.cache.ttl(), || self.store.fetch(query))
            .await
        {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!(error = %e, query = ?query, "slot resolution failed, using placeholders");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::store::MemoryContentStore;
    use std::time::Duration;

    const TTL: Duration = Duration::from_secs(10);

    fn setup(records: Vec<SlotRecord>) -> (Arc<ManualClock>, Arc<MemoryContentStore>, SlotResolver) {
        let clock = Arc::new(ManualClock::new());
        let store = Arc::new(MemoryContentStore::new(records));
        let cache = Arc::new(QueryCache::new(clock.clone(), TTL, 100));
        let resolver = SlotResolver::new(store.clone(), cache);
        (clock, store, resolver)
    }

    fn hero(n: u32) -> SlotRecord {
        SlotRecord::new(format!("home-hero-{:03}", n), "home", "hero")
            .with_image(format!("https://cdn.example.com/{}.jpg", n))
            .with_order(n as i64)
    }

    #[test]
    fn test_duplicate_ids_last_write_wins() {
        let first = hero(1);
        let mut second = hero(1);
        second.label = Some("LATER".into());
        let map = SlotImageMap::from_records(vec![first, second]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("home-hero-001").unwrap().label.as_deref(), Some("LATER"));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_store() {
        let (_clock, store, resolver) = setup(vec![hero(1), hero(2)]);
        let first = resolver.resolve_by_page("home").await;
        let second = resolver.resolve_by_page("home").await;
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_sweep_never_drops_entries_reads_still_trust() {
        let (clock, store, resolver) = setup(vec![hero(1)]);
        resolver.resolve_by_page("home").await;

        clock.advance(TTL - Duration::from_millis(1));
        assert_eq!(resolver.cache().evict_expired().await, 0);
        resolver.resolve_by_page("home").await;
        assert_eq!(store.fetch_count(), 1);

        clock.advance(Duration::from_millis(1));
        assert_eq!(resolver.cache().evict_expired().await, 1);
    }

    #[tokio::test]
    async fn test_refetch_after_ttl() {
        let (clock, store, resolver) = setup(vec![hero(1)]);
        resolver.resolve_by_page("home").await;

        store.replace(vec![hero(1), hero(2)]).await;
        clock.advance(TTL - Duration::from_millis(1));
        assert_eq!(resolver.resolve_by_page("home").await.len(), 1);
        assert_eq!(store.fetch_count(), 1);

        clock.advance(Duration::from_millis(2));
        assert_eq!(resolver.resolve_by_page("home").await.len(), 2);
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_failures_become_empty_results() {
        let (_clock, store, resolver) = setup(vec![hero(1)]);
        store.set_failing(true);

        assert!(resolver.resolve_by_page("home").await.is_empty());
        assert!(resolver.resolve_one("home-hero-001").await.is_none());
        assert!(resolver.resolve_by_section("home", "hero").await.is_empty());
        assert!(resolver.resolve_by_ids(&["home-hero-001"]).await.is_empty());

        // Failures are not cached: recovery is visible immediately
        store.set_failing(false);
        assert_eq!(resolver.resolve_by_page("home").await.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_one_and_section() {
        let (_clock, _store, resolver) = setup(vec![hero(2), hero(1)]);
        let one = resolver.resolve_one("home-hero-002").await.unwrap();
        assert_eq!(one.order, 2);
        assert!(resolver.resolve_one("home-hero-404").await.is_none());

        let section = resolver.resolve_by_section("home", "hero").await;
        let ids: Vec<_> = section.iter().map(|r| r.slot_id.as_str()).collect();
        assert_eq!(ids, vec!["home-hero-001", "home-hero-002"]);
    }

    #[tokio::test]
    async fn test_resolve_by_ids() {
        let (_clock, store, resolver) = setup(vec![hero(1), hero(2), hero(3)]);
        let map = resolver.resolve_by_ids(&["home-hero-001", "home-hero-003"]).await;
        assert_eq!(map.slot_ids().collect::<Vec<_>>(), vec!["home-hero-001", "home-hero-003"]);

        assert!(resolver.resolve_by_ids(&[]).await.is_empty());
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_distinct_queries_use_distinct_entries() {
        let (_clock, store, resolver) = setup(vec![hero(1)]);
        resolver.resolve_by_page("home").await;
        resolver.resolve_by_page("about").await;
        resolver.resolve_by_section("home", "hero").await;
        resolver.resolve_one("home-hero-001").await;
        assert_eq!(store.fetch_count(), 4);
        assert_eq!(resolver.cache().len().await, 4);
    }

    #[tokio::test]
    async fn test_resolve_pages_concurrently() {
        let mut about = SlotRecord::new("about-team-001", "about", "team");
        about.label = Some("TEAM".into());
        let (_clock, _store, resolver) = setup(vec![hero(1), about]);

        let pages = resolver.resolve_pages(&["home", "about", "archive"]).await;
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].page, "home");
        assert_eq!(pages[0].slots.len(), 1);
        assert_eq!(pages[1].slots.len(), 1);
        assert!(pages[2].slots.is_empty());
    }

    #[tokio::test]
    async fn test_page_slots_binder() {
        let (_clock, _store, resolver) = setup(vec![hero(1)]);
        let page = resolver.page_slots("home").await;
        let bind = page.binder();

        let bound = bind("home-hero-001", Some("LOOK 01"));
        assert!(bound.src.is_some());

        let missing = bind("home-hero-007", Some("LOOK 07"));
        assert!(missing.is_placeholder());
        assert_eq!(missing.label.as_deref(), Some("LOOK 07"));
    }
}
