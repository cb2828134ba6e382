//! Calibrant server binary
//!
//! Loads the configured classifier (BERT checkpoint or lexicon fallback) and
//! serves the prediction API until shutdown.

use anyhow::Result;
use calibrant_model::{BertClassifier, LexiconClassifier, ModelSource, TextClassifier};
use calibrant_server::{AppState, ServerConfig};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "calibrant-server")]
#[command(about = "Calibrated text-classification API server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "calibrant.yaml")]
    config: PathBuf,

    /// Local model directory (overrides the config file)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// HuggingFace Hub repository to download the model from
    #[arg(long)]
    hf_repo: Option<String>,

    /// Inference device: cpu, cuda[:N], or metal[:N]
    #[arg(short, long)]
    device: Option<String>,

    /// Default calibration temperature
    #[arg(short, long)]
    temperature: Option<f32>,

    /// Listen address
    #[arg(short = 'l', long)]
    listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    info!("Starting Calibrant server");

    let config = load_config(&cli)?;
    let temperature = config.default_temperature()?;
    info!("Calibration temperature: {}", temperature.get());

    let metrics_handle = init_metrics()?;

    let (classifier, device) = build_classifier(&config)?;
    info!("Serving classifier '{}' on device {device}", classifier.name());

    let state = AppState::new(classifier, temperature, metrics_handle, device);
    let app = calibrant_server::create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.listen, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Load the config file and apply CLI overrides
fn load_config(cli: &Cli) -> Result<ServerConfig> {
    let mut config = ServerConfig::load(&cli.config)?;

    if let Some(listen) = &cli.listen {
        config.listen = listen.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(temperature) = cli.temperature {
        config.temperature = temperature;
    }
    if cli.model.is_some() || cli.hf_repo.is_some() {
        let mut model = config.model.take().unwrap_or_default();
        if let Some(path) = &cli.model {
            model.path = Some(path.clone());
        }
        if let Some(repo) = &cli.hf_repo {
            model.hf_repo = Some(repo.clone());
        }
        config.model = Some(model);
    }
    if let Some(device) = &cli.device {
        if let Some(model) = &mut config.model {
            model.device = device.clone();
        }
    }

    Ok(config)
}

/// Build the classifier named by the configuration, falling back to the
/// lexicon when no model is configured
fn build_classifier(config: &ServerConfig) -> Result<(Arc<dyn TextClassifier>, String)> {
    if let Some(model) = &config.model {
        if let Some(source) = model.source() {
            let device = model.device_kind()?;
            if let ModelSource::Local(path) = &source {
                info!("Loading model from {}", path.display());
            }
            let classifier = BertClassifier::load(&source, device, model.max_length)?;
            return Ok((Arc::new(classifier), device.to_string()));
        }
    }

    warn!("No model configured, serving the lexicon fallback classifier");
    Ok((Arc::new(LexiconClassifier::new()?), "cpu".to_string()))
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown signal received, stopping server...");
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("calibrant=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("calibrant=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return the handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {e}"))?;

    metrics::describe_counter!(
        "calibrant_requests_total",
        "Total number of prediction requests"
    );
    metrics::describe_histogram!(
        "calibrant_prediction_latency_us",
        metrics::Unit::Microseconds,
        "End-to-end prediction latency in microseconds"
    );
    metrics::describe_counter!("calibrant_errors_total", "Total number of prediction errors");

    Ok(handle)
}
