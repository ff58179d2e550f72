use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// Opens the SQLite pool with per-connection pragmas applied.
pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA busy_timeout=10000;").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(url)
        .await?;
    Ok(pool)
}

/// Creates the `characters` table and its indexes if they are missing.
pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    if let Err(e) = sqlx::query("PRAGMA journal_mode=WAL;").execute(pool).await {
        tracing::warn!("Failed to set WAL journal mode: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA synchronous=NORMAL;").execute(pool).await {
        tracing::warn!("Failed to set synchronous mode: {}", e);
    }

    // AUTOINCREMENT keeps ids of deleted rows from being handed out again.
    // The *_folded columns hold Unicode-lowercased copies written by the store;
    // SQLite's LOWER only folds ASCII.
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS characters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(trim(name)) > 0),
            real_name TEXT NULL,
            origin TEXT NULL,
            universe TEXT NULL,
            powers TEXT NULL,
            affiliation TEXT NULL,
            first_appearance TEXT NULL,
            status TEXT NOT NULL DEFAULT 'ATIVO' CHECK (status IN ('ATIVO', 'INATIVO', 'MORTO')),
            description TEXT NULL,
            image_url TEXT NULL,
            name_folded TEXT NOT NULL,
            real_name_folded TEXT NULL,
            origin_folded TEXT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    let indexes = [
        ("idx_characters_affiliation", "CREATE INDEX IF NOT EXISTS idx_characters_affiliation ON characters(affiliation)"),
        ("idx_characters_status", "CREATE INDEX IF NOT EXISTS idx_characters_status ON characters(status)"),
        ("idx_characters_name_folded", "CREATE INDEX IF NOT EXISTS idx_characters_name_folded ON characters(name_folded)"),
    ];

    for (name, query) in indexes {
        if let Err(e) = sqlx::query(query).execute(pool).await {
            tracing::warn!("Failed to create index {}: {}", name, e);
        }
    }

    Ok(())
}
