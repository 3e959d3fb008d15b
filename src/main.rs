use dotenvy::dotenv;
use tracing::{error, info};

use shoky::logging::{init_tracing, shutdown_tracer};
use shoky::metrics::{init_metrics, metrics_app};
use shoky::router::init_router;
use shoky::state::init_app_state;
use shoky_config::ServerConfig;
use shoky_db::run_migrations;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let metrics_handle = init_metrics();
    let state = init_app_state().await;

    if let Err(e) = run_migrations(&state.db).await {
        error!(error = %e, "Failed to run migrations");
        std::process::exit(1);
    }

    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let address = ServerConfig::from_env().address();
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %address, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    info!("🚀 Server running on http://{}", address);
    info!("📚 Swagger UI available at http://{}/swagger-ui", address);
    info!("📖 Scalar UI available at http://{}/scalar", address);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
    }

    shutdown_tracer().await;
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
