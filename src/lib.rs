pub mod api;
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod ingest;
pub mod models;
pub mod services;
pub mod state;

use tokio::signal;

pub use config::Config;
use ingest::Ingestor;
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "seed" | "s" => run_seed(config).await,

        "serve" | "daemon" | "-d" | "--daemon" => run_server(config).await,

        "init" | "--init" => {
            Config::create_default_if_missing()?;
            println!("✓ Config file created. Edit config.toml and run again.");
            Ok(())
        }

        "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        _ => {
            println!("Unknown command: {}", args[1]);
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Animato - Anime Streaming Catalog");
    println!("Seeds a catalog from an aggregator API and serves it over HTTP");
    println!();
    println!("USAGE:");
    println!("  animato <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("  seed              Fetch the upstream home listing and rebuild the catalog");
    println!("  serve             Run the JSON API server");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("  animato seed      # One-shot catalog ingestion (schedule externally)");
    println!("  animato serve     # Serve the catalog API");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure the database, upstream API, and server.");
    println!("  Set ANIMATO_API_KEY to override the protected-endpoint secret.");
}

/// One-shot catalog ingestion. Only one run should execute at a time; the
/// full-replace shelf rebuild is not safe under concurrent writers.
async fn run_seed(config: Config) -> anyhow::Result<()> {
    let shared = SharedState::new(config).await?;
    let ingestor = Ingestor::new(shared.store.clone(), shared.catalog.clone());

    let stats = ingestor.run().await?;

    println!(
        "✓ Seed complete. Anime: {}, featured placements: {}",
        stats.anime, stats.placements
    );
    println!("Run 'animato serve' to serve the catalog.");

    Ok(())
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    if !config.server.enabled {
        anyhow::bail!("Server is disabled in config (server.enabled = false)");
    }

    info!(
        "Animato v{} starting in server mode...",
        env!("CARGO_PKG_VERSION")
    );

    let port = config.server.port;
    let state = api::create_app_state_from_config(config).await?;

    let app = api::router(state).await;
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let server_handle = tokio::spawn(async move {
        info!("🌐 Web Server running at http://0.0.0.0:{}", port);
        if let Err(e) = axum::serve(listener, app).await {
            error!("Web server error: {}", e);
        }
    });

    info!("Server running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    server_handle.abort();
    info!("Server stopped");

    Ok(())
}
