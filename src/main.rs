//! # Vitrine CLI
//!
//! Command-line interface for slot resolution and composition.
//!
//! ## Usage
//!
//! ```bash
//! # Serve the JSON API
//! vitrine serve --listen 0.0.0.0:8080
//!
//! # Resolve a page against the configured content store
//! vitrine resolve home
//!
//! # Resolve one section against a local fixture file
//! vitrine --fixtures demos/slots.json resolve home --section hero
//!
//! # Compose a spec file
//! vitrine compose demos/polaroid.json
//!
//! # List registry names
//! vitrine registry
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use vitrine::{
    Config, CompositionSpec, SlotResolver, VitrineError,
    cache::QueryCache,
    compose, registry,
    server::{self, AppState, ServerConfig},
    store::{ContentStore, HttpContentStore, MemoryContentStore},
};

/// Vitrine - content-managed image slots
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read slot records from a JSON file instead of the content store
    #[arg(long, global = true, value_name = "FILE")]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the JSON API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,
    },

    /// Resolve the slots of a page and print them as JSON
    Resolve {
        /// Page identifier
        page: String,

        /// Only this section, in authored order
        #[arg(long)]
        section: Option<String>,
    },

    /// Compose a composition spec file and print the resolved visual
    Compose {
        /// JSON composition spec
        file: PathBuf,
    },

    /// List every registry name
    Registry,
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vitrine=info,tower_http=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

async fn run() -> Result<(), VitrineError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { listen } => {
            let config = Config::from_env()?;
            let resolver = build_resolver(&config, cli.fixtures.as_deref())?;
            server::serve(
                ServerConfig {
                    listen_addr: listen,
                },
                AppState::new(config, resolver),
            )
            .await?;
        }

        Commands::Resolve { page, section } => {
            let config = Config::from_env()?;
            let resolver = build_resolver(&config, cli.fixtures.as_deref())?;

            let json = match section {
                Some(section) => {
                    serde_json::to_string_pretty(&resolver.resolve_by_section(&page, &section).await)?
                }
                None => serde_json::to_string_pretty(&resolver.resolve_by_page(&page).await)?,
            };
            println!("{}", json);
        }

        Commands::Compose { file } => {
            let text = std::fs::read_to_string(&file)?;
            let spec: CompositionSpec = serde_json::from_str(&text)?;
            let visual = compose(&spec);

            println!("{}", serde_json::to_string_pretty(&visual)?);
            println!();
            println!("wrapper: {}", visual.wrapper_style());
            println!("image:   {}", visual.image_style());
        }

        Commands::Registry => {
            let listing = registry::listing();
            let tables = [
                ("sizes", &listing.sizes),
                ("clips", &listing.clips),
                ("shadows", &listing.shadows),
                ("borders", &listing.borders),
                ("bleeds", &listing.bleeds),
                ("frames", &listing.frames),
                ("decorations", &listing.decorations),
            ];
            for (table, names) in tables {
                println!("{}:", table);
                for name in names {
                    println!("  {}", name);
                }
            }
        }
    }

    Ok(())
}

/// Pick the store: fixtures when given, otherwise the configured content store.
fn build_resolver(config: &Config, fixtures: Option<&Path>) -> Result<SlotResolver, VitrineError> {
    let store: Arc<dyn ContentStore> = match fixtures {
        Some(path) => {
            tracing::info!(path = %path.display(), "using fixture slot records");
            Arc::new(MemoryContentStore::from_json_file(path)?)
        }
        None => Arc::new(HttpContentStore::new(&config.store)?),
    };
    let cache = Arc::new(QueryCache::from_config(&config.cache));
    Ok(SlotResolver::new(store, cache))
}
