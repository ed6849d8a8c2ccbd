// src/bin/api_server.rs

use tourism_arrivals_api::infra::config::Settings;
use tourism_arrivals_api::infra::telemetry;
use tourism_arrivals_api::transport;
use tourism_arrivals_api::{CountryService, RecordStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` may carry RUST_LOG, so it is loaded before the subscriber.
    dotenv::dotenv().ok();
    telemetry::init_tracing();
    let settings = Settings::from_env()?;

    // --- Record Store Initialization ---
    tracing::info!(max_connections = settings.max_connections, "Connecting record store...");
    let store = RecordStore::connect(&settings.database_url, settings.max_connections).await?;
    store.ensure_schema().await?;
    tracing::info!(table = store.schema().table_name(), "Record store ready.");

    let app_state = transport::http::AppState::new(CountryService::new(store));

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("API server listening on http://{}", settings.bind_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", settings.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received (Ctrl+C).");
        })
        .await?;

    tracing::info!("Graceful shutdown complete.");
    Ok(())
}
