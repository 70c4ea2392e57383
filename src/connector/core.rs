//! Connector core: collaborators and shared plumbing.

use crate::config::{ConnectorConfig, DEFAULT_STATUS_ATTRIBUTE};
use crate::error::{ConnectorError, ConnectorResult};
use crate::schema::{Schema, SchemaRepository};
use crate::storage::{RecordStore, RetryingRecordStore};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Lifecycle connector for one governed source.
///
/// Each operation fetches the account schema from the repository, talks to
/// the record store and runs the pure projection engine over the results.
/// The connector keeps no per-account state between calls.
#[derive(Debug, Clone)]
pub struct Connector<R: SchemaRepository, S: RecordStore> {
    pub(super) schemas: R,
    pub(super) store: S,
    pub(super) status_attribute: String,
}

/// Output of a connection test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestConnectionOutput {}

impl<R: SchemaRepository, S: RecordStore> Connector<R, S> {
    /// Create a connector over a schema repository and a record store.
    pub fn new(schemas: R, store: S) -> Self {
        Self {
            schemas,
            store,
            status_attribute: DEFAULT_STATUS_ATTRIBUTE.to_string(),
        }
    }

    /// Use a different attribute for enable/disable.
    pub fn with_status_attribute(mut self, status_attribute: impl Into<String>) -> Self {
        self.status_attribute = status_attribute.into();
        self
    }

    /// Attribute written by enable/disable.
    pub fn status_attribute(&self) -> &str {
        &self.status_attribute
    }

    /// Access the record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch the account schema; failure is fatal to the calling operation.
    pub(super) async fn schema(&self) -> ConnectorResult<Schema> {
        let schema = self.schemas.get_schema().await.map_err(|e| match e {
            ConnectorError::SchemaUnavailable { .. } => e,
            other => ConnectorError::schema_unavailable(other.to_string()),
        })?;
        debug!(
            "Using account schema with {} attributes",
            schema.attributes.len()
        );
        Ok(schema)
    }

    /// Check the connector is usable.
    pub async fn test_connection(&self) -> ConnectorResult<TestConnectionOutput> {
        info!("Test successful!");
        Ok(TestConnectionOutput {})
    }

    /// Return the normalized account schema.
    pub async fn discover_schema(&self) -> ConnectorResult<Schema> {
        let schema = self.schema().await?;
        info!(
            "stdAccountDiscoverSchema sent schema: {}",
            serde_json::to_string(&schema)?
        );
        Ok(schema)
    }
}

impl<R: SchemaRepository, S: RecordStore> Connector<R, RetryingRecordStore<S>> {
    /// Build a connector from a source config, retrying store calls per its policy.
    pub fn from_config(config: &ConnectorConfig, schemas: R, store: S) -> ConnectorResult<Self> {
        config.validate()?;
        let store = RetryingRecordStore::new(store, config.retry_policy());
        Ok(Connector::new(schemas, store).with_status_attribute(config.status_attribute.clone()))
    }
}
