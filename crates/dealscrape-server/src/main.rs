mod api;
mod middleware;

use std::sync::Arc;

use dealscrape_core::{AuditSink, Environment};
use dealscrape_scraper::{ProductScraper, ScraperSettings, TracingAuditSink};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = dealscrape_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = if config.database_url.is_some() {
        let pool = dealscrape_db::connect_pool_from_config(&config).await?;
        let applied = dealscrape_db::run_migrations(&pool).await?;
        tracing::info!(applied, "database ready");
        Some(pool)
    } else {
        tracing::info!("DATABASE_URL not set; scrape audit records go to the log only");
        None
    };

    let audit: Arc<dyn AuditSink> = match &pool {
        Some(pool) => Arc::new(dealscrape_db::PgAuditSink::new(pool.clone())),
        None => Arc::new(TracingAuditSink),
    };

    let scraper = ProductScraper::new(
        &ScraperSettings::from_app_config(&config),
        Arc::clone(&audit),
    )?;

    let auth = AuthState::from_env(matches!(config.env, Environment::Development))?;
    let state = AppState {
        scraper: Arc::new(scraper),
        audit,
        pool,
    };
    let app = build_app(state, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "dealscrape-server listening");
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
