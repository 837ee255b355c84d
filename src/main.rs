use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use spellscan::catalog::{CatalogSnapshot, InMemoryCatalog};
use spellscan::error::SpellscanError;
use spellscan::interface::ScannerService;
use spellscan::scan::ScanPolicy;
use spellscan::server;
use spellscan::weakening::{Effectiveness, NoWeakening, WeakeningTable};

#[derive(Debug, Deserialize)]
struct Settings {
    listen: String,
    /// Path to a catalog snapshot JSON file. Absent means an empty catalog.
    catalog: Option<String>,
    cost_limit: f32,
    hex_name_min_len: usize,
}

fn load_settings() -> Result<Settings, SpellscanError> {
    let defaults = ScanPolicy::default();
    let settings = config::Config::builder()
        .set_default("listen", "127.0.0.1:8474")?
        .set_default("cost_limit", defaults.cost_limit as f64)?
        .set_default("hex_name_min_len", defaults.hex_name_min_len as i64)?
        .add_source(config::File::with_name("spellscan").required(false))
        .add_source(config::Environment::with_prefix("SPELLSCAN"))
        .build()?
        .try_deserialize()?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings()?;
    let policy = ScanPolicy {
        cost_limit: settings.cost_limit,
        hex_name_min_len: settings.hex_name_min_len,
    };

    let (catalog, weakening): (InMemoryCatalog, Arc<dyn Effectiveness + Send + Sync>) =
        match &settings.catalog {
            Some(path) => {
                let document = std::fs::read_to_string(path)?;
                let snapshot = CatalogSnapshot::from_json(&document)?;
                let weakening = WeakeningTable::from_entries(
                    snapshot
                        .early_learned
                        .iter()
                        .map(|(key, ratio)| (key.as_str(), *ratio)),
                );
                info!(
                    path = %path,
                    spells = snapshot.spells.len(),
                    books = snapshot.books.len(),
                    "catalog snapshot loaded"
                );
                (InMemoryCatalog::from_snapshot(snapshot), Arc::new(weakening))
            }
            None => {
                warn!("no catalog snapshot configured, serving an empty catalog");
                (InMemoryCatalog::new(), Arc::new(NoWeakening))
            }
        };

    let service = Arc::new(ScannerService::new(Arc::new(catalog), weakening, policy));
    let router = server::router(service);

    info!(listen = %settings.listen, "spellscan listening");
    let listener = tokio::net::TcpListener::bind(&settings.listen).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
