//! Server settings read from the environment (optionally seeded from `.env` by the binary).

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;
pub const DEFAULT_LOG_FILTER: &str = "markers_api=info,tower_http=info";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { url: String },
    Memory,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub max_connections: u32,
    /// PostgreSQL schema holding the markers table.
    pub schema: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub body_limit: usize,
    /// Used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = parse(
            "BIND_ADDR",
            get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
        )?;

        let backend = match get("MARKERS_STORE").as_deref().unwrap_or("postgres") {
            "postgres" => StoreBackend::Postgres {
                url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    var: "MARKERS_STORE",
                    value: other.to_string(),
                    reason: "expected 'postgres' or 'memory'".into(),
                })
            }
        };

        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => parse("DATABASE_MAX_CONNECTIONS", v)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let body_limit = match get("BODY_LIMIT_BYTES") {
            Some(v) => parse("BODY_LIMIT_BYTES", v)?,
            None => DEFAULT_BODY_LIMIT,
        };

        Ok(ServerConfig {
            bind_addr,
            store: StoreConfig {
                backend,
                max_connections,
                schema: get("MARKERS_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into()),
            },
            body_limit,
            log_filter: get("LOG_FILTER").unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
        })
    }
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_with_database_url() {
        let c = config(&[("DATABASE_URL", "postgres://localhost/markers")]).unwrap();
        assert_eq!(c.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(
            c.store.backend,
            StoreBackend::Postgres {
                url: "postgres://localhost/markers".into()
            }
        );
        assert_eq!(c.store.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(c.store.schema, "public");
        assert_eq!(c.body_limit, DEFAULT_BODY_LIMIT);
        assert_eq!(c.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn postgres_requires_database_url() {
        assert!(matches!(
            config(&[]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
        assert!(matches!(
            config(&[("DATABASE_URL", "  ")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn memory_backend_needs_no_database() {
        let c = config(&[("MARKERS_STORE", "memory"), ("BIND_ADDR", "127.0.0.1:8080")]).unwrap();
        assert_eq!(c.store.backend, StoreBackend::Memory);
        assert_eq!(c.bind_addr.port(), 8080);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = config(&[("MARKERS_STORE", "mongo")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "MARKERS_STORE", .. }));

        let err = config(&[
            ("MARKERS_STORE", "memory"),
            ("DATABASE_MAX_CONNECTIONS", "many"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("DATABASE_MAX_CONNECTIONS"));
    }
}
