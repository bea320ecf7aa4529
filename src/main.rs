use anyhow::Result;
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

use library_catalog::{CatalogConfig, CatalogService, PatronCategory, VERSION};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    // Optional first argument: path to a JSON config file
    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => CatalogConfig::from_file(path)?,
        None => CatalogConfig::default(),
    };

    info!(version = VERSION, "Starting library catalog demo");
    run_demo(config)
}

fn run_demo(config: CatalogConfig) -> Result<()> {
    let mut catalog = CatalogService::with_config(config);

    let maria = catalog
        .register_patron("María González", "maria@email.com", PatronCategory::Student)?
        .id();
    let carlos = catalog
        .register_patron("Dr. Carlos Ruiz", "carlos@email.com", PatronCategory::Faculty)?
        .id();

    let principito = catalog
        .register_book(
            "El Principito",
            "Antoine de Saint-Exupéry",
            "978-84-376-0494-7",
            Some(1943),
            Some("Literatura Infantil"),
        )?
        .id();
    let algoritmos = catalog
        .register_book(
            "Algoritmos y Estructuras de Datos",
            "Niklaus Wirth",
            "978-84-376-0495-4",
            Some(1976),
            Some("Informática"),
        )?
        .id();

    catalog.lend_book(maria, principito)?;
    catalog.lend_book(carlos, algoritmos)?;

    for book in catalog.search_books("Algoritmos") {
        info!(
            title = book.title(),
            available = book.is_available(),
            "Search result"
        );
    }

    if let Err(err) = catalog.lend_book(maria, algoritmos) {
        info!(kind = err.kind(), "Rejected as expected: {}", err);
    }

    let stats = catalog.statistics();
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}
