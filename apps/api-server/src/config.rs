//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use quill_infra::database::DatabaseConfig;

use crate::telemetry::TelemetryConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// HTTP worker threads; actix picks one per core when unset.
    pub workers: Option<usize>,
    /// `None` runs the server on the in-memory store.
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations on startup.
    pub auto_migrate: bool,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| {
                let defaults = DatabaseConfig::new(url);
                DatabaseConfig {
                    max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS")
                        .unwrap_or(defaults.max_connections),
                    min_connections: parsed(&lookup, "DB_MIN_CONNECTIONS")
                        .unwrap_or(defaults.min_connections),
                    sqlx_logging: flag(lookup("DB_LOG_STATEMENTS"), defaults.sqlx_logging),
                    ..defaults
                }
            });

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed(&lookup, "PORT").unwrap_or(8080),
            workers: parsed(&lookup, "WORKERS"),
            database,
            auto_migrate: flag(lookup("AUTO_MIGRATE"), false),
            telemetry: TelemetryConfig::from_lookup(&lookup),
        }
    }
}

/// Boolean switch: `1`/`true`/`yes`/`on` enable, `0`/`false`/`no`/`off` disable.
pub(crate) fn flag(value: Option<String>, default: bool) -> bool {
    match value.as_deref().map(str::trim).map(str::to_ascii_lowercase) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

/// Look up `key` and parse it; malformed values count as unset.
fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_run_in_memory() {
        let config = config(&[]);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.database.is_none());
        assert!(!config.auto_migrate);
        assert!(config.workers.is_none());
    }

    #[test]
    fn test_database_settings() {
        let config = config(&[
            ("DATABASE_URL", "postgres://quill@localhost/quill"),
            ("DB_MAX_CONNECTIONS", "20"),
            ("DB_MIN_CONNECTIONS", "not-a-number"),
            ("AUTO_MIGRATE", "true"),
            ("PORT", "3000"),
        ]);

        let db = config.database.expect("database configured");
        assert_eq!(db.url, "postgres://quill@localhost/quill");
        assert_eq!(db.max_connections, 20);
        assert_eq!(db.min_connections, 10);
        assert!(config.auto_migrate);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_blank_database_url_is_ignored() {
        assert!(config(&[("DATABASE_URL", "  ")]).database.is_none());
    }

    #[test]
    fn test_flag_values() {
        assert!(flag(Some("ON".into()), false));
        assert!(!flag(Some("0".into()), true));
        assert!(flag(Some("maybe".into()), true));
        assert!(!flag(None, false));
    }
}
