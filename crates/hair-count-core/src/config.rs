//! Runtime configuration and logging setup.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Application name.
pub const APP_NAME: &str = "hair-count";
/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Database file used when none is configured.
pub const DEFAULT_DATABASE_PATH: &str = "hair_count.db";
/// Log filter used when neither `RUST_LOG` nor `HAIR_COUNT_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable overriding the database path.
pub const ENV_DATABASE_PATH: &str = "HAIR_COUNT_DB";
/// Environment variable overriding the log filter.
pub const ENV_LOG_FILTER: &str = "HAIR_COUNT_LOG";
/// Environment variable enabling demo data (`1`, `true`, `yes`).
pub const ENV_SEED: &str = "HAIR_COUNT_SEED";

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// tracing-subscriber filter directive
    pub log_filter: String,
    /// Insert demo clients into an empty store on startup
    pub seed_sample_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            seed_sample_data: false,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`, which maps variable names to values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DATABASE_PATH).filter(|v| !v.trim().is_empty()) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(filter) = lookup(ENV_LOG_FILTER).filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter;
        }
        if let Some(seed) = lookup(ENV_SEED) {
            config.seed_sample_data = parse_flag(&seed);
        }

        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `fallback_filter`. Returns false if a subscriber was
/// already installed.
pub fn init_logging(fallback_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} starting v{}", APP_NAME, APP_VERSION);
    }
    installed
}
