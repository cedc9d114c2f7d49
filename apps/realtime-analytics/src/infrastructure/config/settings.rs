//! Service Configuration Settings
//!
//! Configuration for the analytics service, loaded once from environment
//! variables at startup and passed to each component.

/// Default HTTP port.
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Server port settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// HTTP port for ingestion, queries, health and metrics.
    pub http_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Record store table name.
    pub table_name: String,
    /// Only apply updates whose `seq` is newer than the stored one.
    pub enforce_sequence: bool,
    /// Server port settings.
    pub server: ServerSettings,
}

impl AnalyticsConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `ANALYTICS_TABLE` is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `ANALYTICS_TABLE` is missing or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let table_name = lookup("ANALYTICS_TABLE")
            .ok_or_else(|| ConfigError::MissingEnvVar("ANALYTICS_TABLE".to_string()))?;

        if table_name.trim().is_empty() {
            return Err(ConfigError::EmptyValue("ANALYTICS_TABLE".to_string()));
        }

        let enforce_sequence = lookup("ANALYTICS_ENFORCE_SEQUENCE")
            .is_some_and(|v| parse_bool(&v));

        let server = ServerSettings {
            http_port: lookup("ANALYTICS_HTTP_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_HTTP_PORT),
        };

        Ok(Self {
            table_name,
            enforce_sequence,
            server,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AnalyticsConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AnalyticsConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn table_name_only() {
        let config = config_from(&[("ANALYTICS_TABLE", "analytics")]).unwrap();
        assert_eq!(config.table_name, "analytics");
        assert!(!config.enforce_sequence);
        assert_eq!(config.server, ServerSettings::default());
    }

    #[test]
    fn missing_table_name() {
        let err = config_from(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(name) if name == "ANALYTICS_TABLE"));
    }

    #[test]
    fn empty_table_name() {
        let err = config_from(&[("ANALYTICS_TABLE", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(_)));
    }

    #[test]
    fn optional_settings() {
        let config = config_from(&[
            ("ANALYTICS_TABLE", "analytics"),
            ("ANALYTICS_ENFORCE_SEQUENCE", "TRUE"),
            ("ANALYTICS_HTTP_PORT", "9000"),
        ])
        .unwrap();
        assert!(config.enforce_sequence);
        assert_eq!(config.server.http_port, 9000);
    }

    #[test]
    fn invalid_port_falls_back_to_default() {
        let config = config_from(&[
            ("ANALYTICS_TABLE", "analytics"),
            ("ANALYTICS_HTTP_PORT", "not-a-port"),
        ])
        .unwrap();
        assert_eq!(config.server.http_port, DEFAULT_HTTP_PORT);
    }

    #[test]
    fn bool_parsing() {
        assert!(parse_bool("true"));
        assert!(parse_bool(" On "));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }
}
