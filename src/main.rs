use std::sync::Arc;

use axum::middleware;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use marquee_api::{
    config::Config,
    db::{self, Cache},
    middleware::{make_span_with_request_id, request_id_middleware},
    routes::create_router,
    services::providers::{BigQueryProvider, ElasticProvider, TmdbProvider},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let redis_client = db::create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    let catalog = BigQueryProvider::new(
        cache.clone(),
        config.warehouse_api_url.clone(),
        config.warehouse_project.clone(),
        config.warehouse_dataset.clone(),
        config.warehouse_model.clone(),
        config.warehouse_access_token.clone(),
    );

    let search = ElasticProvider::new(
        cache.clone(),
        config.search_api_url.clone(),
        config.search_api_key.clone(),
        config.search_index.clone(),
    );

    let metadata = TmdbProvider::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_base_url.clone(),
    );

    let state = AppState::new(Arc::new(catalog), Arc::new(search), Arc::new(metadata));

    // The browser tier runs on a different origin; mirror the original's
    // blanket CORS policy.
    let app = create_router(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Flush queued cache writes before exiting
    cache_writer.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown signal handler");
    }
}
