use task_forecast::server::{create_router, ServerConfig};

#[tokio::main]
async fn main() {
    task_forecast::env_config::init_tracing();
    let port = task_forecast::env_config::server_port();
    let config = ServerConfig {
        max_buckets: task_forecast::env_config::max_buckets(),
    };
    tracing::info!(max_buckets = config.max_buckets, "Starting forecast API server");

    let app = create_router(config);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(port, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(port, "Server is running. Press Ctrl+C to stop.");
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Stopping server...");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
