//! # Configuration
//!
//! Environment-provided settings for the content store, the query cache and
//! the authoring tool. Loaded once at process start with development
//! defaults, so a bare `vitrine resolve home --fixtures slots.json` works
//! without any variables set.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `VITRINE_ENV` | `development` | `production` selects the long cache TTL |
//! | `VITRINE_STORE_PROJECT_ID` | unset | Content store project identity |
//! | `VITRINE_STORE_DATASET` | `production` | Dataset name |
//! | `VITRINE_STORE_API_VERSION` | `2024-01-01` | Query API version |
//! | `VITRINE_STORE_USE_CDN` | `true` in production | Query the CDN edge |
//! | `VITRINE_STORE_TIMEOUT_MS` | `10000` | Transport timeout |
//! | `VITRINE_STORE_TOKEN` | unset | Write token (never sent on reads) |
//! | `VITRINE_CACHE_TTL_SECS` | 10 / 60 | Overrides the environment TTL |
//! | `VITRINE_CACHE_MAX_ENTRIES` | `100` | Query cache cap |
//! | `VITRINE_STUDIO_URL` | `http://localhost:3333/studio` | Authoring tool base |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::VitrineError;

/// Cache TTL used in development: authored content should show up quickly.
pub const DEVELOPMENT_TTL: Duration = Duration::from_secs(10);

/// Cache TTL used in production-like mode.
pub const PRODUCTION_TTL: Duration = Duration::from_secs(60);

/// Default cap on query cache entries.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default transport timeout for content-store queries.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Deployment environment flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Default cache TTL for this environment.
    pub fn default_ttl(self) -> Duration {
        match self {
            Environment::Development => DEVELOPMENT_TTL,
            Environment::Production => PRODUCTION_TTL,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Production => "production",
        })
    }
}

impl FromStr for Environment {
    type Err = VitrineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "dev" | "development" | "test" => Ok(Environment::Development),
            "prod" | "production" => Ok(Environment::Production),
            other => Err(VitrineError::Config(format!(
                "unknown environment '{}' (expected development or production)",
                other
            ))),
        }
    }
}

/// Content store endpoint identity.
#[derive(Clone)]
pub struct StoreConfig {
    pub project_id: Option<String>,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub timeout: Duration,
    /// Write token. The read path is public and never sends it.
    pub write_token: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            dataset: "production".into(),
            api_version: "2024-01-01".into(),
            use_cdn: false,
            timeout: DEFAULT_TIMEOUT,
            write_token: None,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("use_cdn", &self.use_cdn)
            .field("timeout", &self.timeout)
            .field("write_token", &self.write_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Query cache sizing.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEVELOPMENT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Authoring tool location, used by the debug overlay.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub base_url: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333/studio".into(),
        }
    }
}

impl StudioConfig {
    /// URL of the editing surface for one slot document.
    pub fn edit_url(&self, slot_id: &str) -> String {
        format!(
            "{}/structure/slotImage;{}",
            self.base_url.trim_end_matches('/'),
            slot_id
        )
    }
}

/// Complete process configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub environment: Environment,
    pub store: StoreConfig,
    pub cache: CacheConfig,
    pub studio: StudioConfig,
}

impl Config {
    /// Load configuration from `VITRINE_*` environment variables.
    pub fn from_env() -> Result<Self, VitrineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, VitrineError> {
        let environment = match lookup("VITRINE_ENV") {
            Some(v) => v.parse()?,
            None => Environment::default(),
        };

        let mut store = StoreConfig {
            use_cdn: environment == Environment::Production,
            ..Default::default()
        };
        store.project_id = lookup("VITRINE_STORE_PROJECT_ID").filter(|v| !v.trim().is_empty());
        if let Some(dataset) = lookup("VITRINE_STORE_DATASET") {
            store.dataset = dataset;
        }
        if let Some(version) = lookup("VITRINE_STORE_API_VERSION") {
            store.api_version = version.trim_start_matches('v').to_string();
        }
        if let Some(flag) = lookup("VITRINE_STORE_USE_CDN") {
            store.use_cdn = parse_bool("VITRINE_STORE_USE_CDN", &flag)?;
        }
        if let Some(ms) = lookup("VITRINE_STORE_TIMEOUT_MS") {
            store.timeout = Duration::from_millis(parse_number("VITRINE_STORE_TIMEOUT_MS", &ms)?);
        }
        store.write_token = lookup("VITRINE_STORE_TOKEN").filter(|v| !v.is_empty());

        let mut cache = CacheConfig {
            ttl: environment.default_ttl(),
            ..Default::default()
        };
        if let Some(secs) = lookup("VITRINE_CACHE_TTL_SECS") {
            cache.ttl = Duration::from_secs(parse_number("VITRINE_CACHE_TTL_SECS", &secs)?);
        }
        if let Some(max) = lookup("VITRINE_CACHE_MAX_ENTRIES") {
            let max = parse_number("VITRINE_CACHE_MAX_ENTRIES", &max)?;
            if max == 0 {
                return Err(VitrineError::Config(
                    "VITRINE_CACHE_MAX_ENTRIES must be at least 1".into(),
                ));
            }
            cache.max_entries = max as usize;
        }

        let mut studio = StudioConfig::default();
        if let Some(url) = lookup("VITRINE_STUDIO_URL") {
            studio.base_url = url;
        }

        Ok(Self {
            environment,
            store,
            cache,
            studio,
        })
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, VitrineError> {
    value
        .trim()
        .parse()
        .map_err(|_| VitrineError::Config(format!("{} must be a whole number, got '{}'", key, value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, VitrineError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(VitrineError::Config(format!(
            "{} must be true or false, got '{}'",
            key, value
        ))),
    }
}
