//! Connection configuration file.
//!
//! ```json
//! {
//!   "username": "cassandra",
//!   "password": "cassandra",
//!   "hosts": ["10.0.0.1", "10.0.0.2:9042"]
//! }
//! ```

use crate::error::CassandraPopulatorError;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Port used for hosts given without one.
pub const DEFAULT_PORT: u16 = 9042;

/// Credentials and contact points shared by every client session.
#[derive(Clone, Deserialize)]
pub struct ConnectionConfig {
    pub username: String,
    pub password: String,
    pub hosts: Vec<String>,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("hosts", &self.hosts)
            .finish()
    }
}

impl ConnectionConfig {
    /// Read and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CassandraPopulatorError> {
        let path = path.as_ref();
        tracing::info!("Reading config from JSON file {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(content: &str) -> Result<Self, CassandraPopulatorError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CassandraPopulatorError> {
        if self.hosts.is_empty() {
            return Err(CassandraPopulatorError::Config(
                "At least one host is required".into(),
            ));
        }
        if let Some(host) = self.hosts.iter().find(|h| h.trim().is_empty()) {
            return Err(CassandraPopulatorError::Config(format!(
                "Invalid host '{host}'"
            )));
        }
        Ok(())
    }

    /// Contact points with the default port filled in.
    pub fn known_nodes(&self) -> Vec<String> {
        self.hosts
            .iter()
            .map(|host| {
                let host = host.trim();
                if host_has_port(host) {
                    host.to_string()
                } else {
                    format!("{host}:{DEFAULT_PORT}")
                }
            })
            .collect()
    }
}

fn host_has_port(host: &str) -> bool {
    // `[::1]:9042` style IPv6 literals
    if let Some(rest) = host.strip_prefix('[') {
        return rest.contains("]:");
    }
    // A bare IPv6 address has several colons and no port
    host.matches(':').count() == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config() {
        let config = ConnectionConfig::from_json(
            r#"{"username": "user", "password": "secret", "hosts": ["10.0.0.1", "db:19042"]}"#,
        )
        .unwrap();

        assert_eq!(config.username, "user");
        assert_eq!(config.password, "secret");
        assert_eq!(config.known_nodes(), vec!["10.0.0.1:9042", "db:19042"]);
    }

    #[test]
    fn test_known_nodes_ipv6() {
        let config = ConnectionConfig {
            username: String::new(),
            password: String::new(),
            hosts: vec!["::1".into(), "[::1]:19042".into()],
        };
        assert_eq!(config.known_nodes(), vec!["::1:9042", "[::1]:19042"]);
    }

    #[test]
    fn test_debug_masks_password() {
        let config = ConnectionConfig {
            username: "user".into(),
            password: "secret".into(),
            hosts: vec!["localhost".into()],
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_missing_field() {
        let err = ConnectionConfig::from_json(r#"{"username": "user", "hosts": []}"#).unwrap_err();
        assert!(matches!(err, CassandraPopulatorError::Json(_)));
    }

    #[test]
    fn test_empty_hosts() {
        let err = ConnectionConfig::from_json(r#"{"username": "u", "password": "p", "hosts": []}"#)
            .unwrap_err();
        assert!(matches!(err, CassandraPopulatorError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"username": "u", "password": "p", "hosts": ["localhost"]}}"#
        )
        .unwrap();

        let config = ConnectionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.hosts, vec!["localhost"]);
    }

    #[test]
    fn test_from_missing_file() {
        let err = ConnectionConfig::from_file("/nonexistent/config.json").unwrap_err();
        assert!(matches!(err, CassandraPopulatorError::Io(_)));
    }
}
