//! Server configuration.
//!
//! Defaults suit local development. Each value can be overridden from the
//! environment (a `.env` file is loaded by the binary first) and then again
//! from command-line flags.
//!
//! | Variable                     | Default   |
//! |------------------------------|-----------|
//! | `BOOKSHELF_HOST`             | `0.0.0.0` |
//! | `BOOKSHELF_PORT`             | `3000`    |
//! | `BOOKSHELF_MAX_UPLOAD_BYTES` | `1048576` |
//! | `BOOKSHELF_SEED`             | `true`    |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use crate::error::{ServerError, ServerResult};

/// Maximum size of an uploaded CSV file (1 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

pub const DEFAULT_PORT: u16 = 3000;

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Upload size cap for `/api/books/import`
    pub max_upload_bytes: usize,
    /// Load the demonstration books at startup
    pub seed_sample_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            seed_sample_data: true,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `BOOKSHELF_*` environment variables.
    pub fn from_env() -> ServerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: parse_var(&lookup, "BOOKSHELF_HOST")?.unwrap_or(defaults.host),
            port: parse_var(&lookup, "BOOKSHELF_PORT")?.unwrap_or(defaults.port),
            max_upload_bytes: parse_var(&lookup, "BOOKSHELF_MAX_UPLOAD_BYTES")?
                .unwrap_or(defaults.max_upload_bytes),
            seed_sample_data: parse_var(&lookup, "BOOKSHELF_SEED")?
                .unwrap_or(defaults.seed_sample_data),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> ServerResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ServerError::Config(format!("{}='{}': {}", key, raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.max_upload_bytes, 1_048_576);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BOOKSHELF_HOST", "127.0.0.1"),
            ("BOOKSHELF_PORT", "8080"),
            ("BOOKSHELF_MAX_UPLOAD_BYTES", "2048"),
            ("BOOKSHELF_SEED", "false"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.max_upload_bytes, 2048);
        assert!(!config.seed_sample_data);
    }

    #[test]
    fn test_blank_value_uses_default() {
        let config = ServerConfig::from_lookup(lookup(&[("BOOKSHELF_PORT", "  ")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_value() {
        let err = ServerConfig::from_lookup(lookup(&[("BOOKSHELF_PORT", "eighty")])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("BOOKSHELF_PORT"));
        assert!(msg.contains("eighty"));
    }
}
