use axum::{Router, routing::get};
use configuration::Config;
use service::DynQueryService;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub service: DynQueryService,
}

/// Builds the application router over an already constructed service.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/cryptos/normalized-range", get(handlers::get_ranked_spread))
        .route("/cryptos/highest-normalized-range", get(handlers::get_best_for_date))
        .route("/cryptos/:symbol/stats", get(handlers::get_stats))
        .route("/cryptos/:symbol/stats/period", get(handlers::get_stats_for_period))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Builds the service from `config` and serves HTTP until Ctrl-C.
///
/// Tracing must already be initialised by the caller.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let addr = config.server.socket_addr()?;
    let service = DynQueryService::from_settings(&config.data);
    let app = router(Arc::new(AppState { service }));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal.");
        std::future::pending::<()>().await;
    }
}
