use std::time::Duration;
use crate::api;
use crate::cli::commands::ServeArgs;
use crate::cli::load_config;
use crate::errors::ScannerError;
use tracing::info;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub async fn handle_serve(args: ServeArgs) -> Result<(), ScannerError> {
    let mut config = load_config(&args.config).await?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }

    info!(
        host = %config.server.host,
        port = config.server.port,
        backend = config.audit.backend.as_str(),
        mode = config.audit.mode.as_str(),
        "Starting server"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = api::create_app_state(config)?;
    let orchestrator = state.orchestrator.clone();
    let app = api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    let on_signal = orchestrator.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown requested");
            on_signal.cancel_all();
        })
        .await
        .map_err(|e| ScannerError::Internal(format!("Server error: {}", e)))?;

    orchestrator.shutdown(SHUTDOWN_GRACE).await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
