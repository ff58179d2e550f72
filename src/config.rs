use std::path::{Path, PathBuf};

use serde::Deserialize;

const DEFAULTS: &str = include_str!("../config/default.toml");

/// Hard ceiling for `uploads.max_file_bytes`.
const MAX_UPLOAD_CEILING: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors_permissive: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `sqlite://path/to.db`, `sqlite::memory:` or `memory:` for the in-process store.
    pub url: String,
    pub max_connections: u32,
    #[serde(default)]
    pub seed_on_empty: bool,
}

impl DatabaseConfig {
    pub fn is_in_memory_store(&self) -> bool {
        self.url.starts_with("memory:")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_file_bytes: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub uploads: UploadConfig,
    pub security: Option<SecurityConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        // The embedded TOML ships with the binary; failing to parse it is a build defect.
        let parsed = ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
            .build()
            .and_then(|cfg| cfg.try_deserialize::<AppConfig>());
        match parsed {
            Ok(app_cfg) => app_cfg,
            Err(e) => panic!("embedded default config is invalid: {}", e),
        }
    }
}

/// Loads configuration: embedded defaults -> ./heroes.toml -> $HEROES_CONFIG -> env.
pub fn load() -> anyhow::Result<AppConfig> {
    let _ = dotenvy::dotenv();
    let custom_path = std::env::var("HEROES_CONFIG").ok();
    load_with(custom_path.as_deref())
}

/// Same as [`load`] but with an explicit optional override file.
pub fn load_with(custom_path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        .add_source(::config::File::with_name("heroes").required(false));

    if let Some(path) = custom_path {
        builder = builder.add_source(::config::File::with_name(path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("HEROES").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    if cfg.database.url.trim().is_empty() {
        return Err(anyhow::anyhow!("database.url must not be empty"));
    }
    if cfg.database.max_connections == 0 {
        return Err(anyhow::anyhow!("database.max_connections must be > 0"));
    }

    if cfg.uploads.dir.as_os_str().is_empty() {
        return Err(anyhow::anyhow!("uploads.dir must not be empty"));
    }
    if cfg.uploads.max_file_bytes == 0 || cfg.uploads.max_file_bytes > MAX_UPLOAD_CEILING {
        return Err(anyhow::anyhow!(
            "uploads.max_file_bytes must be in 1..={}",
            MAX_UPLOAD_CEILING
        ));
    }

    Ok(())
}

/// Creates the parent directory of a file-backed `sqlite://` URL.
pub fn ensure_sqlite_parent_dir(url: &str) -> anyhow::Result<()> {
    if let Some(path) = url.strip_prefix("sqlite://") {
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    Ok(())
}
