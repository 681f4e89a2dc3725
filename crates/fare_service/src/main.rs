//! Flight fare predictor service
//!
//! Loads or trains the model before accepting connections, then serves the
//! prediction API and the static web UI.

use anyhow::{Context, Result};
use clap::Parser;
use fare_service::{build_router, AppState, AuditSink, CsvAuditLog, NoopAuditLog, ServiceConfig};
use fare_trainer::{ForestConfig, ModelStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fare-service")]
#[command(about = "Flight fare prediction API")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Historical flights CSV
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Model artifact path
    #[arg(long)]
    artifact: Option<PathBuf>,

    /// Audit log CSV path
    #[arg(long)]
    audit_log: Option<PathBuf>,

    /// Disable the audit log
    #[arg(long)]
    no_audit: bool,

    /// Static web UI directory
    #[arg(long)]
    web_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ServiceConfig::default(),
        };
        config.apply_env_overrides();

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dataset) = &self.dataset {
            config.dataset_path = dataset.clone();
        }
        if let Some(artifact) = &self.artifact {
            config.artifact_path = Some(artifact.clone());
        }
        if let Some(audit_log) = &self.audit_log {
            config.audit_log_path = Some(audit_log.clone());
        }
        if self.no_audit {
            config.audit_log_path = None;
        }
        if let Some(web_dir) = &self.web_dir {
            config.web_dir = web_dir.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = cli.resolve_config()?;
    info!("Flight Fare Service v{}", env!("CARGO_PKG_VERSION"));

    let store = ModelStore::new(config.model_paths(), ForestConfig::default());
    info!(
        "Preparing model (dataset {}, artifact {})",
        store.paths().dataset.display(),
        store.paths().artifact.display()
    );
    let model = tokio::task::spawn_blocking(move || store.load_or_train())
        .await
        .context("Model initialization task panicked")?
        .context("Failed to load or train the model")?;
    info!("Model {} ready", model.version);

    let audit: Arc<dyn AuditSink> = match &config.audit_log_path {
        Some(path) => {
            info!("Audit log: {}", path.display());
            Arc::new(CsvAuditLog::new(path))
        }
        None => Arc::new(NoopAuditLog),
    };

    let state = AppState::new(model)
        .with_audit(audit)
        .with_web_dir(&config.web_dir);
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind listener on {addr}"))?;
    info!("🚀 Fare service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
