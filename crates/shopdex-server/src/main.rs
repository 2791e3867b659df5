mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use shopdex_places::GooglePlacesClient;
use shopdex_search::SearchPlanner;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = shopdex_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = shopdex_db::PoolConfig::from_app_config(&config);
    let pool = shopdex_db::connect_pool(&config.database_url, pool_config).await?;
    shopdex_db::run_migrations(&pool).await?;

    let gateway = if config.places.enabled {
        let api_key = config
            .places
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("places provider enabled without an API key"))?;
        let client = GooglePlacesClient::with_base_url(
            api_key,
            config.places.timeout_secs,
            &config.places.base_url,
        )?;
        tracing::info!(base_url = %config.places.base_url, "places provider enabled");
        Some(client)
    } else {
        tracing::info!("places provider disabled; text search runs against the local index");
        None
    };

    let planner = Arc::new(SearchPlanner::new(pool.clone(), gateway));
    let app = build_app(AppState { pool, planner });

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
