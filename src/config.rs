//! Runtime settings read from the environment.

use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which backend holds the contacts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl FromStr for StorageKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageKind::Postgres),
            "memory" => Ok(StorageKind::Memory),
            _ => Err(ConfigError::UnknownStorage(s.to_string())),
        }
    }
}

/// Database connection settings. The password is resolved at connect time, not here.
#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    /// Full URL; when set, the parts below are ignored.
    pub url: Option<String>,
    pub user: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub password: Option<String>,
    pub password_file: PathBuf,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            url: None,
            user: "postgres".into(),
            host: "localhost".into(),
            port: 5432,
            name: "postgres".into(),
            password: None,
            password_file: PathBuf::from(".secret"),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

impl DatabaseSettings {
    /// Connection options. Reads the secret file when no URL or password was given.
    /// Credentials are set on the builder, so reserved URL characters need no escaping.
    pub async fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return url
                .parse::<PgConnectOptions>()
                .map_err(|e| ConfigError::InvalidUrl(e.to_string()));
        }
        let password = match &self.password {
            Some(p) => p.clone(),
            None => tokio::fs::read_to_string(&self.password_file)
                .await
                .map_err(|e| ConfigError::Secret(format!("{}: {}", self.password_file.display(), e)))?
                .trim_end()
                .to_string(),
        };
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&password)
            .database(&self.name))
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: String,
    pub storage: StorageKind,
    /// Prefix the contacts router is nested under, e.g. `/api`. Empty for none.
    pub api_prefix: String,
    pub database: DatabaseSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bind_addr: "0.0.0.0:8000".into(),
            storage: StorageKind::Postgres,
            api_prefix: String::new(),
            database: DatabaseSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let db = defaults.database;
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = DatabaseSettings {
            url: get("DATABASE_URL"),
            user: get("DB_USER").unwrap_or(db.user),
            host: get("DB_HOST").unwrap_or(db.host),
            port: parse_or("DB_PORT", get("DB_PORT"), db.port)?,
            name: get("DB_NAME").unwrap_or(db.name),
            password: lookup("DB_PASSWORD"),
            password_file: get("DB_PASSWORD_FILE").map(PathBuf::from).unwrap_or(db.password_file),
            max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), db.max_connections)?,
            acquire_timeout: Duration::from_secs(parse_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                get("DB_ACQUIRE_TIMEOUT_SECS"),
                db.acquire_timeout.as_secs(),
            )?),
        };

        let storage = match get("CONTACTS_STORAGE") {
            Some(s) => s.parse()?,
            None => defaults.storage,
        };

        let api_prefix = get("API_PREFIX")
            .map(|p| normalize_prefix(&p))
            .unwrap_or(defaults.api_prefix);

        Ok(Settings {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            storage,
            api_prefix,
            database,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: v }),
        None => Ok(default),
    }
}

/// `api/` and `/api/` both become `/api`; `/` becomes empty.
fn normalize_prefix(p: &str) -> String {
    let trimmed = p.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
