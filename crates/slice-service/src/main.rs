use clap::Parser;
use slice_service::config::Settings;
use slice_service::{build_router, seed_default_slices, MetricSimulator, ServiceState};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "slice_service=info,slice_core=info,slice_adapters=info,info".to_string()
        }))
        .init();

    let settings = Settings::parse();
    let state = ServiceState::bootstrap(&settings)?;
    info!(backend_mode = ?settings.backend_mode, "slice registry initialised");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let simulator_task = if settings.enable_simulator {
        let seeded = seed_default_slices(&state.orchestrator).await;
        info!(seeded = seeded.len(), "demo slices ready");
        let simulator = MetricSimulator::new(
            Arc::clone(&state.orchestrator),
            settings.poll_interval(),
        );
        Some(tokio::spawn(simulator.run(shutdown_rx)))
    } else {
        None
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(settings.listen).await?;
    info!("slice-service REST listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("slice-service shutting down");
    let _ = shutdown_tx.send(true);
    if let Some(task) = simulator_task {
        if let Err(err) = task.await {
            warn!(error = %err, "metric simulator task ended abnormally");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => info!("received terminate signal, initiating graceful shutdown"),
    }
}
