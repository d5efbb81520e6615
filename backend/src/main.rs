//! Backend entry-point: loads configuration, prepares storage, and serves the
//! story, chat history, and sign-in endpoints.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use mindweaver::inbound::http::health::HealthState;
use mindweaver::inbound::http::session_config::{
    BuildMode, fingerprint::key_fingerprint, session_settings_from_env,
};
use mindweaver::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, ServerSettings, create_server};

async fn connect_database(settings: &ServerSettings) -> std::io::Result<Option<DbPool>> {
    let Some(url) = settings.database_url().map(str::to_owned) else {
        return Ok(None);
    };

    let migration_url = url.clone();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))?
        .map_err(std::io::Error::other)?;
    info!(count = applied.len(), "database migrations applied");

    let config = PoolConfig::new(url).with_max_size(settings.db_max_connections());
    let pool = DbPool::new(config)
        .await
        .map_err(|err| std::io::Error::other(err.into_message()))?;
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load configuration: {err}")))?;
    info!(settings = ?settings, "configuration loaded");

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(fingerprint = %key_fingerprint(&session.key), "session key loaded");

    for name in settings.missing_credentials() {
        warn!(variable = name, "optional configuration missing");
    }

    let pool = connect_database(&settings).await?;
    let config = ServerConfig::new(session, settings);
    let config = match pool {
        Some(pool) => config.with_db_pool(pool),
        None => config,
    };

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
