use std::env;

const DEFAULT_DB_PATH: &str = "scoreboard.db";
const DEFAULT_PORT: u16 = 8090;
const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Server settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `DB_PATH`
    pub db_path: String,
    /// `PORT`; an unparsable value falls back to the default
    pub port: u16,
    /// `BIND_HOST`
    pub bind_host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            port: DEFAULT_PORT,
            bind_host: DEFAULT_BIND_HOST.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            db_path: lookup("DB_PATH").unwrap_or(defaults.db_path),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse::<u16>().ok())
                .unwrap_or(defaults.port),
            bind_host: lookup("BIND_HOST").unwrap_or(defaults.bind_host),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:8090");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DB_PATH", "/tmp/s.db"),
            ("PORT", "9000"),
            ("BIND_HOST", "127.0.0.1"),
        ]));
        assert_eq!(config.db_path, "/tmp/s.db");
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")]));
        assert_eq!(config.port, 8090);
    }
}
