use axum::Router;
use chrono::Duration;
use tracing::*;

use postboard::auth::Authenticator;
use postboard::config::{self, AppCfg, StoreKind};
use postboard::store::{pg, MemoryStore, PgStore};
use postboard::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::tracing::init();

    let cfg = AppCfg::load()?;
    let auth = Authenticator::new(&cfg.jwt_secret, Duration::minutes(cfg.token_ttl_minutes));

    let router: Router = match cfg.store {
        StoreKind::Postgres => {
            if cfg.run_migrations {
                pg::run_migrations(cfg.database_url.clone()).await?;
            }
            let store = PgStore::connect(&cfg.database_url, cfg.pool_max_size)?;
            app(AppState::new(store, auth), &cfg.cors_origins)
        }
        StoreKind::Memory => {
            warn!("using the in-memory store, nothing survives a restart");
            app(AppState::new(MemoryStore::new(), auth), &cfg.cors_origins)
        }
    };

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    info!("starting listening at {}", cfg.bind_addr);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(%e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
