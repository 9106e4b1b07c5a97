use std::{process::ExitCode, sync::Arc};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod models;
mod records;
mod routes;
mod storage;
mod supabase;

use config::{AppConfig, Backend, ConfigError};
use records::{InMemoryRecords, RecordStore, SupabaseRecords};
use routes::{RouterOptions, build_router};
use storage::{LocalFileStorage, MediaStorage, StorageError, SupabaseStorage};
use supabase::{SupabaseClient, SupabaseClientError};

#[derive(Error, Debug)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to prepare upload directory: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to set up Supabase client: {0}")]
    Supabase(#[from] SupabaseClientError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;
    let addr = config.socket_addr()?;

    let (storage, records, uploads_dir, max_file_bytes) = match &config.backend {
        Backend::Local { storage_path } => {
            let storage = LocalFileStorage::new(storage_path.clone(), "/uploads")?;
            tracing::info!(path = %storage.storage_path().display(), "using local storage");
            let storage: Arc<dyn MediaStorage> = Arc::new(storage);
            let records: Arc<dyn RecordStore> = Arc::new(InMemoryRecords::new());
            (storage, records, Some(storage_path.clone()), None)
        }
        Backend::Supabase(supabase) => {
            let client = SupabaseClient::new(&supabase.url, &supabase.anon_key)?;
            tracing::info!(
                bucket = %supabase.bucket,
                table = %supabase.table,
                "using Supabase storage"
            );
            let storage: Arc<dyn MediaStorage> =
                Arc::new(SupabaseStorage::new(client.clone(), supabase.bucket.clone()));
            let records: Arc<dyn RecordStore> =
                Arc::new(SupabaseRecords::new(client, supabase.table.clone()));
            (storage, records, None, Some(supabase.max_upload_bytes))
        }
    };

    let app = build_router(
        storage,
        records,
        RouterOptions {
            static_dir: config.static_dir.clone(),
            uploads_dir,
            max_file_bytes,
        },
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // without a handler the server runs until killed
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
