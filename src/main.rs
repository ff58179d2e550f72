use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::{migrate::MigrateDatabase, Sqlite};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heroes_api::{
    config, db, routes, seed,
    state::AppState,
    store::{CharacterStore, MemoryCharacterStore, SqliteCharacterStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging: stdout plus a daily rotated file under ./logs
    std::fs::create_dir_all("logs").ok();
    let (stdout_nb, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let file_appender = tracing_appender::rolling::daily("logs", "heroes-api.log");
    let (file_nb, file_guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(stdout_nb))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_nb))
        .init();
    // Dropping the guards would stop the non-blocking writers from flushing
    let _log_guards = (stdout_guard, file_guard);

    let app_cfg = config::load()?;

    let store: Arc<dyn CharacterStore> = if app_cfg.database.is_in_memory_store() {
        info!("Using in-memory character store; data is lost on exit");
        Arc::new(MemoryCharacterStore::new())
    } else {
        let db_url = &app_cfg.database.url;
        config::ensure_sqlite_parent_dir(db_url)?;
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            info!("Creating SQLite database at {}", db_url);
            Sqlite::create_database(db_url).await?;
        }
        let pool = db::connect(db_url, app_cfg.database.max_connections).await?;
        db::init_db(&pool).await?;
        Arc::new(SqliteCharacterStore::new(pool))
    };

    tokio::fs::create_dir_all(&app_cfg.uploads.dir).await?;

    let state = AppState::new(store, app_cfg.clone());

    if app_cfg.database.seed_on_empty {
        seed::seed_if_empty(&state.characters)
            .await
            .map_err(|e| anyhow::anyhow!("seeding failed: {}", e))?;
    }

    let app = routes::router(state);

    let addr: SocketAddr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port)
        .parse()
        .map_err(|e| {
            anyhow::anyhow!("invalid listen addr {}:{} - {}", app_cfg.server.host, app_cfg.server.port, e)
        })?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Heroes API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received. Stopping server...");
}
