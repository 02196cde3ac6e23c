//! Gateway server: reads settings from the environment, builds the three store clients,
//! and serves every route group until Ctrl-C or SIGTERM.

use std::sync::Arc;
use tokio::net::TcpListener;
use tristore_gateway::{
    build_app, AppState, GatewayConfig, MongoUserStore, MySqlProductStore, S3ObjectStore,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("tristore_gateway=info,tower_http=info")
            }),
        )
        .init();

    let config = GatewayConfig::from_env()?;

    let users = Arc::new(MongoUserStore::connect(&config.document).await?);
    let startup_ping = Arc::clone(&users);
    tokio::spawn(async move {
        match startup_ping.ping().await {
            Ok(()) => tracing::info!("connected to document store"),
            Err(e) => tracing::error!(error = %e, "document store unreachable"),
        }
    });

    let products = Arc::new(MySqlProductStore::connect_lazy(&config.relational));
    let objects = Arc::new(S3ObjectStore::from_config(&config.object_storage).await);

    let state = AppState::new(users, products, objects)
        .with_error_details(config.expose_error_details);
    let app = build_app(state, config.body_limit_bytes);

    let listener = TcpListener::bind(config.listen_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
