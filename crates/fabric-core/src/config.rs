//! Agent configuration.
//!
//! Configuration files are JSON documents. Every string value may contain
//! `${VAR}` / `${VAR:-default}` placeholders, which are resolved against an
//! [`EnvLookup`] before the document is deserialized into typed settings.
//!
//! ```json
//! {
//!   "name": "IRIS",
//!   "gps": {
//!     "fabric_endpoint": "${FABRIC_ENDPOINT:-http://localhost:8545}",
//!     "timeout_secs": 10
//!   }
//! }
//! ```

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::env::EnvLookup;
use crate::interpolate::interpolate_env_vars;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Configuration not found: {0}")]
    NotFound(String),

    /// The configuration file could not be read.
    #[error("Read error: {0}")]
    ReadError(String),

    /// The configuration is not valid JSON or does not match the expected shape.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Configuration Types
// ============================================================================

/// Default agent name used in exports and logs.
pub const DEFAULT_AGENT_NAME: &str = "IRIS";

/// Default JSON-RPC endpoint of the Fabric network.
pub const DEFAULT_FABRIC_ENDPOINT: &str = "http://localhost:8545";

/// Top-level agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Agent name.
    pub name: String,

    /// GPS Fabric connector settings.
    pub gps: GpsFabricConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_AGENT_NAME.to_string(),
            gps: GpsFabricConfig::default(),
        }
    }
}

/// Configuration for the GPS Fabric connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpsFabricConfig {
    /// The endpoint URL for the Fabric network.
    pub fabric_endpoint: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Runtime variable holding the latitude.
    pub latitude_variable: String,

    /// Runtime variable holding the longitude.
    pub longitude_variable: String,

    /// Runtime variable holding the yaw (heading) in degrees.
    pub yaw_variable: String,
}

impl Default for GpsFabricConfig {
    fn default() -> Self {
        Self {
            fabric_endpoint: DEFAULT_FABRIC_ENDPOINT.to_string(),
            timeout_secs: 10,
            latitude_variable: "latitude".to_string(),
            longitude_variable: "longitude".to_string(),
            yaw_variable: "yaw_deg".to_string(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Parse a JSON document and interpolate environment variables into it.
pub fn load_config_str<E>(text: &str, env: &E) -> Result<Value, ConfigError>
where
    E: EnvLookup + ?Sized,
{
    let raw: Value =
        serde_json::from_str(text).map_err(|e| ConfigError::InvalidData(e.to_string()))?;
    Ok(interpolate_env_vars(&raw, env))
}

/// Read a JSON configuration file and interpolate environment variables into it.
pub fn load_config_file<E>(path: &Path, env: &E) -> Result<Value, ConfigError>
where
    E: EnvLookup + ?Sized,
{
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::NotFound(path.display().to_string()),
        _ => ConfigError::ReadError(format!("{}: {}", path.display(), e)),
    })?;
    tracing::debug!(path = %path.display(), "Loaded configuration file");
    load_config_str(&text, env)
}

/// Deserialize an interpolated document into a typed configuration.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, ConfigError> {
    serde_json::from_value(value).map_err(|e| ConfigError::InvalidData(e.to_string()))
}

impl AgentConfig {
    /// Load, interpolate and deserialize an agent configuration file.
    pub fn load<E>(path: &Path, env: &E) -> Result<Self, ConfigError>
    where
        E: EnvLookup + ?Sized,
    {
        from_value(load_config_file(path, env)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config: AgentConfig = from_value(serde_json::json!({})).unwrap();

        assert_eq!(config, AgentConfig::default());
        assert_eq!(config.name, "IRIS");
        assert_eq!(config.gps.fabric_endpoint, "http://localhost:8545");
        assert_eq!(config.gps.timeout_secs, 10);
        assert_eq!(config.gps.yaw_variable, "yaw_deg");
    }

    #[test]
    fn test_load_str_interpolates_before_deserializing() {
        let env: HashMap<String, String> =
            [("FABRIC_HOST".to_string(), "fabric.local".to_string())].into();
        let text = r#"{
            "name": "${AGENT_NAME:-Spot}",
            "gps": {"fabric_endpoint": "http://${FABRIC_HOST}:8545", "timeout_secs": 3}
        }"#;

        let config: AgentConfig = from_value(load_config_str(text, &env).unwrap()).unwrap();

        assert_eq!(config.name, "Spot");
        assert_eq!(config.gps.fabric_endpoint, "http://fabric.local:8545");
        assert_eq!(config.gps.timeout_secs, 3);
        assert_eq!(config.gps.latitude_variable, "latitude");
    }

    #[test]
    fn test_invalid_json() {
        let env: HashMap<String, String> = HashMap::new();
        let err = load_config_str("{not json", &env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidData(_)));
    }

    #[test]
    fn test_wrong_shape() {
        let err = from_value::<AgentConfig>(serde_json::json!({"gps": {"timeout_secs": "ten"}}))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidData(_)));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"gps": {{"fabric_endpoint": "${{ENDPOINT:-http://127.0.0.1:9000}}"}}}}"#
        )
        .unwrap();

        let env: HashMap<String, String> = HashMap::new();
        let config = AgentConfig::load(file.path(), &env).unwrap();

        assert_eq!(config.gps.fabric_endpoint, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_missing_file() {
        let env: HashMap<String, String> = HashMap::new();
        let err = AgentConfig::load(Path::new("/nonexistent/fabric.json"), &env).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
