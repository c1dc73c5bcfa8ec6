use anyhow::Result;
use kube::Client;
use netparams_core::CloudNetworks;
use netparams_gce::GceNetworks;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod metrics;
mod param_set_controller;

use config::{ControllerConfig, LogFormat};
use metrics::ControllerMetrics;
use param_set_controller::ParamSetController;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ControllerConfig::load()?;
    init_tracing(config.log_format);

    info!("Starting netparams-controller...");
    info!(
        "  - Project: {} (network project: {})",
        config.cloud.project_id,
        config.cloud.network_project()
    );
    info!("  - Region: {}", config.cloud.region);

    let metrics = Arc::new(ControllerMetrics::new()?);
    let cloud: Arc<dyn CloudNetworks> = Arc::new(GceNetworks::new(config.cloud.clone())?);
    let client = Client::try_default().await?;

    let metrics_addr = config.metrics_addr;
    let server_metrics = metrics.clone();
    tokio::spawn(async move {
        if let Err(e) = metrics::serve(metrics_addr, server_metrics).await {
            error!("Metrics server error: {}", e);
        }
    });

    let controller = ParamSetController::new(client, cloud, metrics, &config);

    tokio::select! {
        result = controller.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received, exiting..."),
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
}
