//! Serve command - HTML form, JSON API, probes and metrics

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::api::create_router;
use crate::config::AppConfig;
use crate::domain::DomainError;
use crate::infrastructure::observability::init_metrics;

/// Arguments for the serve command
#[derive(Args, Clone, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory holding the trained artifacts
    #[arg(long)]
    pub artifacts_dir: Option<PathBuf>,
}

/// Run the server until Ctrl+C or SIGTERM
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = super::load_config()?;
    super::init_logging(&config);
    apply(&args, &mut config);

    // artifacts are loaded before binding so a missing file fails fast
    let state = crate::create_app_state(&config).await.map_err(|e| match e {
        DomainError::MissingArtifacts { .. } => anyhow::anyhow!(super::missing_artifacts_hint(
            &e,
            &config.artifacts.dir.display().to_string()
        )),
        other => anyhow::Error::new(other),
    })?;
    let metrics = init_metrics(&config.metrics);
    let app = create_router(state, metrics);

    let addr = build_socket_addr(&config)?;
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

fn apply(args: &ServeArgs, config: &mut AppConfig) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = &args.artifacts_dir {
        config.artifacts.dir = dir.clone();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
