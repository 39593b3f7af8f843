//! ttn-exporter - Prometheus exporter for a The Things Network gateway.

use clap::Parser;
use tracing::info;
use ttn_exporter::logging::init_tracing;
use ttn_exporter::{Cli, ExporterConfig, ExporterServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = ExporterConfig::try_from(cli)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        api_url = %config.api_url,
        gateway = %config.gateway_id,
        timeout = %humantime::format_duration(config.timeout),
        "starting ttn-exporter"
    );

    let server = ExporterServer::new(&config)?;
    server
        .serve_with_shutdown(config.listen_addr, shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}
