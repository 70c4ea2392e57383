//! Connector source configuration.
//!
//! The governance platform hands each connector instance a JSON document
//! describing the source it serves. [`ConnectorConfig`] is that document,
//! plus a few optional knobs for the collaborators.

use crate::error::{ConnectorError, ConnectorResult};
use crate::storage::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Environment variable holding the connector config JSON.
pub const CONFIG_ENV_VAR: &str = "CONNECTOR_CONFIG";

/// Path of the OAuth token endpoint, relative to the API origin.
pub const TOKEN_URL_PATH: &str = "/oauth/token";

/// Attribute toggled by enable/disable when none is configured.
pub const DEFAULT_STATUS_ATTRIBUTE: &str = "IIQDisabled";

/// Source configuration for a connector instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorConfig {
    /// API base URL of the governance tenant
    #[serde(rename = "baseurl")]
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Id of the source whose accounts this connector serves
    pub source_id: String,
    /// Display name of the connector's own source
    #[serde(default)]
    pub cloud_display_name: Option<String>,
    /// Attribute written by enable/disable
    #[serde(default = "default_status_attribute")]
    pub status_attribute: String,
    /// Retries for transient store failures
    #[serde(default)]
    pub max_retries: Option<u32>,
}

fn default_status_attribute() -> String {
    DEFAULT_STATUS_ATTRIBUTE.to_string()
}

impl ConnectorConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> ConnectorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> ConnectorResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ConnectorError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Read the config from the `CONNECTOR_CONFIG` environment variable.
    pub fn from_env() -> ConnectorResult<Self> {
        let json = std::env::var(CONFIG_ENV_VAR)
            .map_err(|_| ConnectorError::config(format!("{} is not set", CONFIG_ENV_VAR)))?;
        Self::from_json_str(&json)
    }

    /// Check required fields and the base URL.
    pub fn validate(&self) -> ConnectorResult<()> {
        for (field, value) in [
            ("clientId", &self.client_id),
            ("clientSecret", &self.client_secret),
            ("sourceId", &self.source_id),
            ("statusAttribute", &self.status_attribute),
        ] {
            if value.trim().is_empty() {
                return Err(ConnectorError::config(format!("'{}' must not be empty", field)));
            }
        }
        self.token_url().map(|_| ())
    }

    /// OAuth token endpoint: origin of the base URL plus `/oauth/token`.
    pub fn token_url(&self) -> ConnectorResult<Url> {
        let base = Url::parse(&self.base_url).map_err(|e| {
            ConnectorError::config(format!("invalid baseurl '{}': {}", self.base_url, e))
        })?;
        if !base.origin().is_tuple() {
            return Err(ConnectorError::config(format!(
                "baseurl '{}' has no origin",
                self.base_url
            )));
        }

        let origin = base.origin().ascii_serialization();
        Url::parse(&format!("{}{}", origin, TOKEN_URL_PATH))
            .map_err(|e| ConnectorError::config(format!("invalid token url: {}", e)))
    }

    /// Retry policy for store calls made on behalf of this source.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self.max_retries {
            Some(max_retries) => RetryPolicy::default().with_max_retries(max_retries),
            None => RetryPolicy::default(),
        }
    }
}
