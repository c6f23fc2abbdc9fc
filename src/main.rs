//! Tile Gate - A map tile front end that skips tiles known to be empty.
//!
//! This binary starts the HTTP server and configures all components.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tile_gate::{
    config::{Config, StoreKind, EXISTING_FILTER_NAME},
    create_router, create_s3_client, ExistingTileFilter, GridSubset, MemoryTileStore,
    PlaceholderTiles, RouterConfig, S3TileStore, TileLayer, TileService, TileStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    print_banner();
    log_configuration(&config);

    let store = build_store(&config).await;

    let tile_service = match build_tile_service(&config, store) {
        Ok(service) => service,
        Err(e) => {
            error!("Failed to set up tile service: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let router = create_router(tile_service, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl http://{}/layers", addr);
    info!("    curl -i http://{}/tiles/{}/0/0/0.png", addr, config.layer);
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Print the startup banner.
fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    info!("");
    info!("████████╗██╗██╗     ███████╗     ██████╗  █████╗ ████████╗███████╗");
    info!("╚══██╔══╝██║██║     ██╔════╝    ██╔════╝ ██╔══██╗╚══██╔══╝██╔════╝");
    info!("   ██║   ██║██║     █████╗      ██║  ███╗███████║   ██║   █████╗  ");
    info!("   ██║   ██║██║     ██╔══╝      ██║   ██║██╔══██║   ██║   ██╔══╝  ");
    info!("   ██║   ██║███████╗███████╗    ╚██████╔╝██║  ██║   ██║   ███████╗");
    info!("   ╚═╝   ╚═╝╚══════╝╚══════╝     ╚═════╝ ╚═╝  ╚═╝   ╚═╝   ╚══════╝");
    info!("");
    info!("                        v{}", version);
}

fn log_configuration(config: &Config) {
    info!("Configuration:");
    info!(
        "  Layer: {} ({}, zoom {}-{})",
        config.layer, config.grid, config.min_zoom, config.max_zoom
    );

    match config.store {
        StoreKind::Memory => info!(
            "  Store: memory ({}MB)",
            config.memory_capacity / (1024 * 1024)
        ),
        StoreKind::S3 => {
            info!(
                "  Store: s3://{}/{}",
                config.s3_bucket.as_deref().unwrap_or_default(),
                config.s3_prefix.as_deref().unwrap_or_default()
            );
            if let Some(ref endpoint) = config.s3_endpoint {
                info!("  S3 endpoint: {}", endpoint);
            }
            info!("  S3 region: {}", config.s3_region);
        }
        StoreKind::None => {
            warn!("  Store: NONE - tiles that pass the filters cannot be served");
        }
    }

    if config.existing_filter {
        let window = |bound: Option<u32>| bound.map_or("-".to_string(), |z| z.to_string());
        info!(
            "  Existing-tile filter: zoom {}..{}, {} placeholders",
            window(config.zoom_start),
            window(config.zoom_stop),
            if config.debug_tiles { "debug" } else { "blank" }
        );
    } else {
        info!("  Existing-tile filter: disabled");
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "tile_gate=debug,tower_http=debug"
    } else {
        "tile_gate=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Create the configured tile store.
async fn build_store(config: &Config) -> Option<Arc<dyn TileStore>> {
    match config.store {
        StoreKind::Memory => Some(Arc::new(MemoryTileStore::with_capacity(
            config.memory_capacity,
        ))),
        StoreKind::S3 => {
            let client =
                create_s3_client(config.s3_endpoint.as_deref(), &config.s3_region).await;
            let bucket = config.s3_bucket.clone().unwrap_or_default();
            Some(Arc::new(S3TileStore::new(
                client,
                bucket,
                config.s3_prefix.clone(),
            )))
        }
        StoreKind::None => None,
    }
}

/// Assemble the layer and tile service.
fn build_tile_service(
    config: &Config,
    store: Option<Arc<dyn TileStore>>,
) -> Result<TileService, Box<dyn std::error::Error>> {
    let grid = GridSubset::full_pyramid(config.grid.as_str(), config.min_zoom, config.max_zoom);
    let mut layer = TileLayer::new(config.layer.as_str(), grid);

    if config.existing_filter {
        let filter = ExistingTileFilter::new(EXISTING_FILTER_NAME, config.filter_config())?;
        layer = layer.with_filter(Arc::new(filter))?;
    }

    let placeholders = PlaceholderTiles::new(config.tile_size)?;
    Ok(TileService::with_placeholders(store, placeholders).with_layer(layer))
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new()
        .with_cache_max_age(config.cache_max_age)
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}
