//! `accounts-svc`: service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (tracing + optional OTLP).
//! 3. Initialise AWS SDK clients (S3, and KMS when a region is configured).
//! 4. Build the field encryptor and the accounts document store.
//! 5. Load the API document served under `{base}/swagger`.
//! 6. Build the Axum router and start the HTTP server.

mod accounts;
mod aws;
mod config;
mod crypto;
mod server;
mod store;
mod telemetry;

use std::{path::Path, sync::Arc};

use anyhow::Result;
use tracing::{info, warn};

use accounts::AccountService;
use config::Config;
use crypto::{FieldEncryptor, KmsRandom, OsRandom, RandomSource};
use server::{docs::ApiDocs, state::AppState};
use store::{DocumentStore, S3ObjectStore};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otlp_endpoint(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        base_path = %cfg.base_path,
        bucket = %cfg.bucket,
        key = %cfg.keyfile,
        "accounts-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. AWS clients
    // -----------------------------------------------------------------------
    let aws = aws::AwsClients::init(&cfg).await;

    // -----------------------------------------------------------------------
    // 4. Encryption + document store
    // -----------------------------------------------------------------------
    let random: Arc<dyn RandomSource> = match aws.kms.clone() {
        Some(kms) => {
            info!("IVs generated by KMS");
            Arc::new(KmsRandom::new(kms))
        }
        None => {
            info!("IVs generated locally");
            Arc::new(OsRandom)
        }
    };
    let data_key = cfg.data_key()?;
    if data_key.is_none() {
        warn!("DATA_KEY is not configured; account create and update will be refused");
    }
    let encryptor = FieldEncryptor::new(data_key, random);

    let store = DocumentStore::new(
        Arc::new(S3ObjectStore::new(aws.s3.clone())),
        &cfg.bucket,
        &cfg.keyfile,
    );
    if !store.exists().await {
        warn!("accounts document not found; requests will fail until it is created");
    }
    let accounts = AccountService::new(store, encryptor);

    // -----------------------------------------------------------------------
    // 5. API documentation
    // -----------------------------------------------------------------------
    let api_docs = match ApiDocs::load(Path::new(&cfg.api_docs_path)).await {
        Ok(docs) => {
            info!(file = %docs.file_name, "API document loaded");
            Some(docs)
        }
        Err(e) => {
            warn!(error = %format!("{e:#}"), "API document unavailable; docs routes will return 404");
            None
        }
    };

    // -----------------------------------------------------------------------
    // 6. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(accounts, api_docs, &cfg.base_path);
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
