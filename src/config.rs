use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub server_addr: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_per_min: u32,

    // Logging
    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server_addr: text("SERVER_ADDR", "127.0.0.1:8080"),
            database_url: text("DATABASE_URL", "sqlite://hrms.db"),
            db_max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            api_prefix: text("API_PREFIX", "/api"),
            rate_per_min: parse_var(&lookup, "RATE_PER_MIN", 1000)?,
            log_dir: text("LOG_DIR", "logs"),
            log_level: parse_var(&lookup, "LOG_LEVEL", tracing::Level::INFO)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:8080");
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.rate_per_min, 1000);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.log_level, tracing::Level::INFO);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("RATE_PER_MIN", "30"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.rate_per_min, 30);
        assert_eq!(config.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn malformed_number_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("RATE_PER_MIN", "lots")])).unwrap_err();
        assert!(err.to_string().contains("RATE_PER_MIN"));
    }
}
