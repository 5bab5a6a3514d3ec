//! Runtime configuration read from environment variables.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use url::Url;

/// SQL type that identifier and reference parameters are cast to.
///
/// Identifiers always arrive as strings; the statement text casts them
/// (`$1::uuid`) so the store sees the column's real type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyType {
    #[default]
    Uuid,
    Text,
    BigInt,
}

impl KeyType {
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Text => "text",
            Self::BigInt => "bigint",
        }
    }

    /// Placeholder for parameter `n` with the key cast applied.
    pub fn placeholder(self, n: usize) -> String {
        format!("${n}::{}", self.sql_type())
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_type())
    }
}

impl FromStr for KeyType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uuid" => Ok(Self::Uuid),
            "text" => Ok(Self::Text),
            "bigint" | "int8" => Ok(Self::BigInt),
            other => Err(anyhow!(
                "unknown key type '{other}' (expected uuid, text or bigint)"
            )),
        }
    }
}

/// Database pool settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
}

/// Everything the server binary needs.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database: DatabaseConfig,
    pub port: u16,
    pub cors_origin: String,
    pub static_dir: String,
    pub key_type: KeyType,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 3001;

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let max_connections = parse_or(&lookup, "DATABASE_POOL_SIZE", 10)?;
        let timeout_secs: u64 = parse_or(&lookup, "DATABASE_CONNECT_TIMEOUT_SECS", 30)?;
        let port = parse_or(&lookup, "PORT", Self::DEFAULT_PORT)?;
        let key_type = parse_or(&lookup, "BIZDIR_KEY_TYPE", KeyType::default())?;

        Ok(Self {
            database: DatabaseConfig {
                database_url,
                max_connections,
                connection_timeout: Duration::from_secs(timeout_secs),
            },
            port,
            cors_origin: lookup("CORS_ORIGIN").unwrap_or_else(|| "*".to_string()),
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "public".to_string()),
            key_type,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid value for {key} ({raw:?}): {e}")),
        None => Ok(default),
    }
}

/// Hide the password part of a connection string before logging it.
pub fn mask_database_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => "***".to_string(),
    }
}
