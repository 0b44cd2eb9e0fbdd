use std::env;

use crate::importer::ManufacturerPolicy;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub db_max_connections: u32,
    pub listen_addr: String,
    /// YAML definitions file; empty means the built-in definitions
    pub definitions_path: String,
    pub manufacturer_policy: ManufacturerPolicy,
    pub import_on_startup: bool,
    pub import_dry_run: bool,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            db_path: get_env("DB_PATH", "/data/catalog.db"),
            db_max_connections: get_env("DB_MAX_CONNECTIONS", "5")
                .parse()
                .unwrap_or(5),
            listen_addr: get_env("LISTEN_ADDR", "0.0.0.0:8080"),
            definitions_path: get_env("DEFINITIONS_PATH", ""),
            manufacturer_policy: get_env("MANUFACTURER_POLICY", "create")
                .parse()
                .unwrap_or_else(|e| {
                    tracing::warn!("{} - falling back to create-on-demand", e);
                    ManufacturerPolicy::default()
                }),
            import_on_startup: get_bool_env("IMPORT_ON_STARTUP", false),
            import_dry_run: get_bool_env("IMPORT_DRY_RUN", false),
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_bool_env(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => parse_bool(&v).unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" YES "), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool(""), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
