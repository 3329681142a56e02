mod clients;
mod components;
mod config;
mod error;
mod helpers;
mod models;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use clients::OperatorClient;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<OperatorClient>,
    pub config: Arc<config::Config>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("operator_console=info,tower_http=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = args
        .windows(2)
        .find_map(|w| (w[0] == "-config" || w[0] == "--config").then(|| w[1].clone()))
        .or_else(|| args.first().filter(|a| !a.starts_with('-')).cloned())
        .unwrap_or_else(|| "/etc/operator-console/config.yaml".to_string());

    let cfg = config::Config::load(&PathBuf::from(&config_path)).unwrap_or_else(|e| {
        eprintln!("error loading config: {}", e);
        std::process::exit(1);
    });

    let client = OperatorClient::new(
        cfg.operator.base_url.clone(),
        cfg.operator.session_cookie.clone(),
    )
    .unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    let client = Arc::new(client);
    let cfg = Arc::new(cfg);

    // Shutdown signal
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(());

    tokio::spawn(clients::health::run_health_checker(
        client.clone(),
        cfg.health_interval(),
        shutdown_rx,
    ));

    let state = AppState {
        client,
        config: cfg.clone(),
    };

    let router = routes::build_router(state);

    let listen_addr = cfg.listen_addr();
    let listener = TcpListener::bind(&listen_addr).await.unwrap_or_else(|e| {
        eprintln!("failed to bind {}: {}", listen_addr, e);
        std::process::exit(1);
    });

    info!(
        "operator-console listening on {} (backend {})",
        listen_addr, cfg.operator.base_url
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(());
        })
        .await
        .unwrap_or_else(|e| {
            eprintln!("server error: {}", e);
            std::process::exit(1);
        });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
