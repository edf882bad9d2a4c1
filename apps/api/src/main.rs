mod config;
mod errors;
mod journal;
mod models;
mod persistence;
mod resume;
mod routes;
mod state;
mod template;
mod uploads;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::journal::JournalBook;
use crate::persistence::{FileStorage, MemoryStorage, Storage};
use crate::resume::sample::{BundledSample, HttpSample, SampleSource};
use crate::resume::ResumeStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::template::TemplateStore;
use crate::uploads::UploadDir;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    let storage: Arc<dyn Storage> = match &config.storage_dir {
        Some(dir) => {
            let files = FileStorage::open(dir)?;
            info!("Persisting stores under {}", files.dir().display());
            Arc::new(files)
        }
        None => {
            info!("STORAGE_DIR=memory; state will not survive a restart");
            Arc::new(MemoryStorage::default())
        }
    };

    // Both stores hydrate from storage before the first request is served.
    let resume = Arc::new(ResumeStore::open(storage.clone()));
    let template = Arc::new(TemplateStore::open(storage));

    let sample: Arc<dyn SampleSource> = match &config.sample_data_url {
        Some(url) => {
            info!("Sample data source: {url}");
            Arc::new(HttpSample::new(url.clone())?)
        }
        None => Arc::new(BundledSample),
    };

    let uploads = UploadDir::new(config.upload_dir.clone());
    info!("Uploads directory: {}", uploads.root().display());

    let state = AppState {
        resume,
        template,
        journal: JournalBook::default(),
        uploads,
        sample,
        config: config.clone(),
    };

    let app = build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
