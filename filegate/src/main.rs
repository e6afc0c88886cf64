//! FileGate - HTTP gateway to an object-storage bucket
//!
//! Uploads files under `{userID}/{folderName}/{filename}` and deletes single
//! objects or whole folders (key prefixes).

mod config;
mod router;

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filegate_auth::Credentials;
use filegate_storage::{EphemeralStore, GatewayState, ObjectStore, S3Settings, S3Store, UrlStrategy};

use crate::config::{Backend, Config};

#[derive(Parser, Debug)]
#[command(name = "filegate")]
#[command(about = "HTTP gateway for uploading and deleting files in an object-storage bucket", long_about = None)]
struct Args {
    /// Configuration file (defaults to ./filegate.toml when present)
    #[arg(short, long, env = "FILEGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "FILEGATE_PORT")]
    port: Option<u16>,

    /// Host to bind to
    #[arg(long, env = "FILEGATE_HOST")]
    host: Option<String>,

    /// Storage backend
    #[arg(long, value_enum, env = "FILEGATE_BACKEND")]
    backend: Option<Backend>,

    /// Credentials CSV file (header line, then access key and secret key)
    #[arg(long, env = "FILEGATE_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "FILEGATE_LOG_LEVEL")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "filegate={level},filegate_storage={level},filegate_auth={level},tower_http=debug",
                    level = args.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(backend) = args.backend {
        config.storage.backend = backend;
    }
    if let Some(path) = args.credentials {
        config.credentials.path = path;
    }

    info!("Starting FileGate...");
    info!("  Backend: {:?}", config.storage.backend);
    info!("  Bucket: {} ({})", config.storage.bucket, config.storage.region);
    info!("  URLs: {:?}", config.storage.url.strategy());

    // Build the object store handle shared by every request
    let store = build_store(&config).await?;
    let state = GatewayState::new(store);

    // Create router
    let app = router::create_router(state, config.server.max_form_bytes);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn ObjectStore>> {
    let storage = &config.storage;
    let urls = storage.url.strategy();

    match storage.backend {
        Backend::S3 => {
            let credentials = load_credentials(config)?;
            let mut settings = S3Settings::new(&storage.bucket, &storage.region, credentials);
            settings.endpoint_url = storage.endpoint_url.clone();
            settings.force_path_style = storage.force_path_style;
            settings.urls = urls;
            settings.list_all_pages = storage.list_all_pages;
            Ok(Arc::new(S3Store::connect(settings).await))
        }
        Backend::Ephemeral => {
            let store = EphemeralStore::new(&storage.bucket)
                .with_list_all_pages(storage.list_all_pages);
            let store = match urls {
                UrlStrategy::Public => store,
                UrlStrategy::Presigned { expires_in } => {
                    store.with_presigned_urls(load_credentials(config)?, &storage.region, expires_in)
                }
            };
            Ok(Arc::new(store))
        }
    }
}

fn load_credentials(config: &Config) -> anyhow::Result<Credentials> {
    let path = &config.credentials.path;
    Credentials::from_csv_file(path)
        .with_context(|| format!("Failed to load credentials from {}", path.display()))
}
