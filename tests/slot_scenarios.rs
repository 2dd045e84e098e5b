//! # Slot Scenarios
//!
//! End-to-end behaviour of resolution, binding, composition and the debug
//! overlay, driven through the public API with an in-memory store and a
//! manual clock.

use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use vitrine::cache::{ManualClock, QueryCache};
use vitrine::config::StudioConfig;
use vitrine::debug::{ClickOutcome, DebugSession, MemoryClipboard, RecordingOpener};
use vitrine::registry::{ClipShape, Decoration, FrameStyle, ShadowProfile, SizeClass};
use vitrine::store::{MemoryContentStore, SlotRecord};
use vitrine::{CompositionSpec, SlotBinding, SlotResolver, compose};

const TTL: Duration = Duration::from_secs(10);

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn setup(records: Vec<SlotRecord>) -> (Arc<MemoryContentStore>, Arc<ManualClock>, SlotResolver) {
    let store = Arc::new(MemoryContentStore::new(records));
    let clock = Arc::new(ManualClock::new());
    let cache = Arc::new(QueryCache::new(clock.clone(), TTL, 100));
    let resolver = SlotResolver::new(store.clone(), cache);
    (store, clock, resolver)
}

fn hero_with_image() -> SlotRecord {
    SlotRecord::new("home-hero-001", "home", "hero").with_image("https://cdn.example.com/hero.jpg")
}

// ============================================================================
// RESOLUTION AND BINDING
// ============================================================================

#[tokio::test]
async fn test_missing_slot_renders_label_placeholder() {
    let (_, _, resolver) = setup(vec![]);

    let home = resolver.page_slots("home").await;
    let binding = home.bind("home-hero-001", Some("Hero"));

    assert_eq!(
        binding,
        SlotBinding {
            slot_id: "home-hero-001".into(),
            label: Some("Hero".into()),
            ..Default::default()
        }
    );
    assert!(binding.is_placeholder());
}

#[tokio::test]
async fn test_partial_record_falls_back_to_default_label_for_alt() {
    let (_, _, resolver) = setup(vec![hero_with_image()]);

    let home = resolver.page_slots("home").await;
    let binding = home.bind("home-hero-001", Some("Hero"));

    assert_eq!(binding.src.as_deref(), Some("https://cdn.example.com/hero.jpg"));
    assert_eq!(binding.alt.as_deref(), Some("Hero"));
    assert_eq!(binding.label.as_deref(), Some("Hero"));
    assert!(!binding.is_placeholder());
}

#[tokio::test]
async fn test_store_outage_degrades_to_placeholders_and_is_not_cached() {
    let (store, _, resolver) = setup(vec![hero_with_image()]);
    store.set_failing(true);

    let home = resolver.page_slots("home").await;
    assert!(home.slots.is_empty());
    assert!(home.bind("home-hero-001", Some("Hero")).is_placeholder());
    assert!(resolver.cache().is_empty().await);

    store.set_failing(false);
    let home = resolver.page_slots("home").await;
    assert!(!home.bind("home-hero-001", Some("Hero")).is_placeholder());
    assert_eq!(store.fetch_count(), 2);
}

#[tokio::test]
async fn test_entry_is_fresh_just_before_ttl_and_stale_just_after() {
    let (store, clock, resolver) = setup(vec![hero_with_image()]);

    resolver.resolve_by_page("home").await;
    clock.advance(TTL - Duration::from_millis(1));
    resolver.resolve_by_page("home").await;
    assert_eq!(store.fetch_count(), 1);

    clock.advance(Duration::from_millis(2));
    resolver.resolve_by_page("home").await;
    assert_eq!(store.fetch_count(), 2);
}

#[tokio::test]
async fn test_authored_edits_show_up_after_ttl() {
    let (store, clock, resolver) = setup(vec![SlotRecord::new("home-hero-001", "home", "hero")]);

    let before = resolver.page_slots("home").await;
    assert!(before.bind("home-hero-001", None).is_placeholder());

    store.replace(vec![hero_with_image()]).await;
    let cached = resolver.page_slots("home").await;
    assert!(cached.bind("home-hero-001", None).is_placeholder());

    clock.advance(TTL);
    let after = resolver.page_slots("home").await;
    assert!(!after.bind("home-hero-001", None).is_placeholder());
}

#[tokio::test]
async fn test_cache_holds_at_most_max_entries() {
    let (_, _, resolver) = setup(vec![]);

    for i in 0..101 {
        resolver.resolve_by_page(&format!("page-{}", i)).await;
    }

    let stats = resolver.cache().stats().await;
    assert_eq!(stats.entries, 100);
    assert_eq!(stats.evictions, 1);
}

#[tokio::test]
async fn test_section_and_single_lookups_share_one_store() {
    let records = vec![
        SlotRecord::new("home-hero-002", "home", "hero")
            .with_order(2)
            .with_image("https://cdn.example.com/b.jpg"),
        hero_with_image().with_order(1),
        SlotRecord::new("home-grid-001", "home", "grid"),
    ];
    let (_, _, resolver) = setup(records);

    let hero: Vec<String> = resolver
        .resolve_by_section("home", "hero")
        .await
        .into_iter()
        .map(|r| r.slot_id)
        .collect();
    assert_eq!(hero, vec!["home-hero-001", "home-hero-002"]);

    let one = resolver.resolve_one("home-grid-001").await;
    assert_eq!(one.map(|r| r.section), Some("grid".to_string()));
    assert_eq!(resolver.resolve_one("home-grid-404").await, None);

    let ids = resolver.resolve_by_ids(&["home-hero-002", "home-grid-001"]).await;
    assert_eq!(ids.slot_ids().collect::<Vec<_>>(), vec!["home-grid-001", "home-hero-002"]);
}

#[tokio::test]
async fn test_demo_fixtures_load() {
    let store = MemoryContentStore::from_json_file(Path::new("demos/slots.json")).unwrap();
    let cache = Arc::new(QueryCache::new(Arc::new(ManualClock::new()), TTL, 100));
    let resolver = SlotResolver::new(Arc::new(store), cache);

    let home = resolver.page_slots("home").await;
    // home-gallery-002 is inactive
    assert_eq!(
        home.slots.slot_ids().collect::<Vec<_>>(),
        vec!["home-gallery-001", "home-hero-001", "home-hero-002"]
    );

    let hero = home.bind("home-hero-001", Some("Hero"));
    assert_eq!(hero.alt.as_deref(), Some("Portrait of the photographer at work"));
    assert_eq!(hero.width, Some(2400));
    assert!(hero.hotspot.is_some());
}

// ============================================================================
// COMPOSITION
// ============================================================================

#[test]
fn test_composition_is_deterministic() {
    let spec = CompositionSpec {
        size: SizeClass::Lg,
        rotation: -4.0,
        clip: ClipShape::TornTop,
        shadow: ShadowProfile::Lifted,
        frame: FrameStyle::Polaroid,
        decoration: Decoration::TapeCorners,
        ..Default::default()
    };

    let first = compose(&spec);
    let second = compose(&spec.clone());
    assert_eq!(first, second);
    assert_eq!(first.to_json(), second.to_json());
}

#[test]
fn test_demo_spec_composes() {
    let text = std::fs::read_to_string("demos/polaroid.json").unwrap();
    let spec: CompositionSpec = serde_json::from_str(&text).unwrap();
    let visual = compose(&spec);

    assert_eq!((visual.width, visual.height), (440, 550));
    assert_eq!(visual.transform.as_deref(), Some("rotate(-4deg)"));
    assert!(visual.frame.is_some());
    assert_eq!(visual.overlays.len(), 1);
}

// ============================================================================
// DEBUG OVERLAY
// ============================================================================

#[tokio::test]
async fn test_debug_click_copies_and_opens_editor() {
    let clipboard = Arc::new(MemoryClipboard::default());
    let opener = Arc::new(RecordingOpener::default());
    let session = DebugSession::new(
        "https://site.example.com/archive?debug-slots",
        StudioConfig::default(),
        clipboard.clone(),
        opener.clone(),
    );

    session.pointer_enter("archive-header-002");
    assert_eq!(session.hovered().as_deref(), Some("archive-header-002"));

    let outcome = session.click("archive-header-002");
    assert!(outcome.prevents_default());
    assert_eq!(clipboard.contents().as_deref(), Some("archive-header-002"));
    assert_eq!(
        opener.opened(),
        vec!["http://localhost:3333/studio/structure/slotImage;archive-header-002".to_string()]
    );

    // A plain navigation ends debug mode
    let session = session.navigate("https://site.example.com/archive");
    assert!(!session.is_active());
    assert_eq!(session.click("archive-header-002"), ClickOutcome::PassThrough);
    assert_eq!(opener.opened().len(), 1);
}
