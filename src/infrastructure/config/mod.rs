use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

pub const MEMORY_DATABASE_URL: &str = "memory://";

const MAX_SYNC_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;
const MAX_FETCH_TIMEOUT_SECS: u64 = 10 * 60;
const MAX_ACCESS_TOKEN_MINUTES: i64 = 24 * 60;
const MAX_DAYS: i64 = 10 * 365;
const MAX_PARALLEL_USERS: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("invalid value for `{key}`: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Command line flags. Every flag falls back to its environment variable.
#[derive(Debug, Default, Parser)]
#[command(name = "feedhub", version, about = "Multi-user feed reader service")]
pub struct Cli {
    /// TOML file with defaults for any setting below
    #[arg(long, env = "FEEDHUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// `postgres://...` or `memory://`
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[arg(long, env = "LISTEN_ADDR")]
    pub listen_addr: Option<String>,

    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    #[arg(long, env = "ACCESS_TOKEN_MINUTES")]
    pub access_token_minutes: Option<i64>,

    #[arg(long, env = "REFRESH_TOKEN_DAYS")]
    pub refresh_token_days: Option<i64>,

    #[arg(long, env = "SYNC_INTERVAL_SECS")]
    pub sync_interval_secs: Option<u64>,

    #[arg(long, env = "MAX_PARALLEL_USERS")]
    pub max_parallel_users: Option<usize>,

    #[arg(long, env = "FETCH_TIMEOUT_SECS")]
    pub fetch_timeout_secs: Option<u64>,

    #[arg(long, env = "ENTRY_RETENTION_DAYS")]
    pub entry_retention_days: Option<i64>,

    /// `pretty` or `json`
    #[arg(long, env = "LOG_FORMAT")]
    pub log_format: Option<String>,
}

/// Contents of the optional TOML file. Same keys as the flags.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub database_url: Option<String>,
    pub listen_addr: Option<String>,
    pub jwt_secret: Option<String>,
    pub access_token_minutes: Option<i64>,
    pub refresh_token_days: Option<i64>,
    pub sync_interval_secs: Option<u64>,
    pub max_parallel_users: Option<usize>,
    pub fetch_timeout_secs: Option<u64>,
    pub entry_retention_days: Option<i64>,
    pub log_format: Option<String>,
}

impl FileConfig {
    pub fn from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Memory,
    Postgres(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: Storage,
    pub listen_addr: SocketAddr,
    pub jwt_secret: String,
    pub access_token_ttl: chrono::Duration,
    pub refresh_token_ttl: chrono::Duration,
    pub sync_interval: Duration,
    pub max_parallel_users: usize,
    pub fetch_timeout: Duration,
    pub entry_retention: Option<chrono::Duration>,
    pub log_format: LogFormat,
}

impl Config {
    /// Load `.env`, parse the command line and resolve every layer.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let cli = Cli::parse();
        let file = match &cli.config {
            Some(path) => FileConfig::from_path(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }

    /// Flags (or their environment variables) win over the file, which
    /// wins over the built-in defaults.
    pub fn resolve(cli: Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let database_url = cli
            .database_url
            .or(file.database_url)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("database_url"))?;
        let storage = parse_storage(&database_url)?;

        let listen_addr = cli
            .listen_addr
            .or(file.listen_addr)
            .unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let listen_addr = listen_addr.parse().map_err(|e| ConfigError::Invalid {
            key: "listen_addr",
            message: format!("{}", e),
        })?;

        let jwt_secret = cli
            .jwt_secret
            .or(file.jwt_secret)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("jwt_secret"))?;

        let access_minutes = positive(
            "access_token_minutes",
            cli.access_token_minutes.or(file.access_token_minutes).unwrap_or(15),
            MAX_ACCESS_TOKEN_MINUTES,
        )?;
        let refresh_days = positive(
            "refresh_token_days",
            cli.refresh_token_days.or(file.refresh_token_days).unwrap_or(30),
            MAX_DAYS,
        )?;
        let sync_secs = positive(
            "sync_interval_secs",
            cli.sync_interval_secs.or(file.sync_interval_secs).unwrap_or(900),
            MAX_SYNC_INTERVAL_SECS,
        )?;
        let max_parallel_users = positive(
            "max_parallel_users",
            cli.max_parallel_users
                .or(file.max_parallel_users)
                .unwrap_or(crate::domain::sync::DEFAULT_MAX_PARALLEL_USERS),
            MAX_PARALLEL_USERS,
        )?;
        let fetch_secs = positive(
            "fetch_timeout_secs",
            cli.fetch_timeout_secs.or(file.fetch_timeout_secs).unwrap_or(10),
            MAX_FETCH_TIMEOUT_SECS,
        )?;
        let entry_retention = cli
            .entry_retention_days
            .or(file.entry_retention_days)
            .map(|days| positive("entry_retention_days", days, MAX_DAYS))
            .transpose()?
            .map(chrono::Duration::days);

        let log_format = match cli
            .log_format
            .or(file.log_format)
            .unwrap_or_else(|| "pretty".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Invalid {
                    key: "log_format",
                    message: format!("expected `pretty` or `json`, got `{}`", other),
                })
            }
        };

        Ok(Self {
            storage,
            listen_addr,
            jwt_secret,
            access_token_ttl: chrono::Duration::minutes(access_minutes),
            refresh_token_ttl: chrono::Duration::days(refresh_days),
            sync_interval: Duration::from_secs(sync_secs),
            max_parallel_users,
            fetch_timeout: Duration::from_secs(fetch_secs),
            entry_retention,
            log_format,
        })
    }
}

fn parse_storage(url: &str) -> Result<Storage, ConfigError> {
    if url == MEMORY_DATABASE_URL {
        Ok(Storage::Memory)
    } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(Storage::Postgres(url.to_string()))
    } else {
        Err(ConfigError::Invalid {
            key: "database_url",
            message: "expected a postgres:// URL or memory://".to_string(),
        })
    }
}

/// Accept values in `1..=max`.
fn positive<T: PartialOrd + Default + std::fmt::Display>(
    key: &'static str,
    value: T,
    max: T,
) -> Result<T, ConfigError> {
    if value <= T::default() {
        Err(ConfigError::Invalid {
            key,
            message: format!("must be positive, got {}", value),
        })
    } else if value > max {
        Err(ConfigError::Invalid {
            key,
            message: format!("must be at most {}, got {}", max, value),
        })
    } else {
        Ok(value)
    }
}
