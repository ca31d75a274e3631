//! Fishdex - fish species catalog and catch-unlock service

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fishdex::{
    catalog::{fish_catalog, CatalogSeeder},
    config::Args,
    db::MongoClient,
    server::{self, AppState},
    store::{CatalogStore, MemoryCatalogStore, MongoCatalogStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("fishdex={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Fishdex - fish species catalog");
    info!("======================================");
    info!("Node ID: {}", args.node_id);
    info!("Listen: {}", args.listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("MongoDB: {} (db: {})", args.mongo_url, args.db_name);
    info!("List limit: {}", args.list_limit);
    info!("Strict unlock: {}", args.strict_unlock);
    info!("======================================");

    // MongoDB is required unless running in dev mode
    let mongo = match MongoClient::new(&args.mongo_url, &args.db_name).await {
        Ok(client) => Some(client),
        Err(e) => {
            if args.dev_mode {
                warn!("MongoDB connection failed (dev mode, using in-memory store): {}", e);
                None
            } else {
                error!("MongoDB connection failed: {}", e);
                std::process::exit(1);
            }
        }
    };

    let store: Arc<dyn CatalogStore> = match &mongo {
        Some(client) => Arc::new(MongoCatalogStore::new(client).await?),
        None => Arc::new(MemoryCatalogStore::new()),
    };

    // Seeding failures are fatal; a foreign claim is logged by the seeder
    CatalogSeeder::new(Arc::clone(&store), args.node_id.to_string())
        .ensure_seeded(&fish_catalog())
        .await?;

    let state = Arc::new(AppState::new(args, store));
    let result = server::run(state, server::shutdown_signal()).await;

    if let Some(client) = mongo {
        client.shutdown().await;
    }

    result?;
    info!("Fishdex stopped");
    Ok(())
}
