//! # Vitrine - Content-Managed Image Slots
//!
//! Vitrine resolves named image slots for marketing pages from a headless
//! content store and turns them into render-ready props. It provides:
//!
//! - **Query cache**: bounded, TTL-based caching of content-store queries
//! - **Slot resolution**: page, section and identifier lookups that degrade
//!   to placeholders instead of failing
//! - **Binding**: resolved records to image props with label fallbacks
//! - **Composition**: declarative layout parameters to concrete geometry and CSS
//! - **Debug overlay**: per-page-view slot identification for editors
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use vitrine::{Config, SlotResolver, cache::QueryCache, store::HttpContentStore};
//!
//! # async fn example() -> Result<(), vitrine::VitrineError> {
//! let config = Config::from_env()?;
//! let store = Arc::new(HttpContentStore::new(&config.store)?);
//! let cache = Arc::new(QueryCache::from_config(&config.cache));
//! let resolver = SlotResolver::new(store, cache);
//!
//! let home = resolver.page_slots("home").await;
//! let hero = home.bind("home-hero-001", Some("Hero image"));
//! if hero.is_placeholder() {
//!     println!("placeholder: {:?}", hero.label);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | FIFO query cache with TTL freshness |
//! | [`store`] | Content-store client and slot record schema |
//! | [`resolver`] | Cached slot lookups |
//! | [`binding`] | Slot record to image props |
//! | [`registry`] | Named size, clip, shadow, border, bleed, frame and decoration tables |
//! | [`compose`] | Composition engine |
//! | [`debug`] | Debug overlay protocol |
//! | [`server`] | HTTP surface |
//! | [`config`] | Environment configuration |
//! | [`error`] | Error types |

pub mod binding;
pub mod cache;
pub mod compose;
pub mod config;
pub mod debug;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod server;
pub mod store;

// Re-exports for convenience
pub use binding::{SlotBinding, bind};
pub use compose::{CompositionSpec, ResolvedVisual, compose};
pub use config::Config;
pub use error::VitrineError;
pub use resolver::{PageSlots, SlotImageMap, SlotResolver};
