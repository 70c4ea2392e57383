//! Schema repositories.
//!
//! A [`SchemaRepository`] supplies the normalized account schema to the
//! connector. Fetching is the repository's business; the projection engine
//! only ever sees the resulting [`Schema`] value.

use super::discovery::{SourceSchemaDocument, discover_account_schema};
use super::types::Schema;
use crate::error::{ConnectorError, ConnectorResult};
use log::{debug, trace};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Source of the normalized account schema.
///
/// A failure here is fatal to any operation that needs the schema.
pub trait SchemaRepository: Send + Sync {
    /// Fetch the current account schema.
    fn get_schema(&self) -> impl Future<Output = ConnectorResult<Schema>> + Send;
}

/// Repository serving a fixed, already normalized schema.
///
/// The schema is validated on every fetch, so a schema declaring an
/// attribute twice is reported as unavailable rather than served.
#[derive(Debug, Clone)]
pub struct StaticSchemaRepository {
    schema: Schema,
}

impl StaticSchemaRepository {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }
}

impl SchemaRepository for StaticSchemaRepository {
    async fn get_schema(&self) -> ConnectorResult<Schema> {
        self.schema.validate()?;
        Ok(self.schema.clone())
    }
}

/// Repository normalizing a captured source schema listing on every call.
#[derive(Debug, Clone)]
pub struct DiscoveredSchemaRepository {
    documents: Vec<SourceSchemaDocument>,
}

impl DiscoveredSchemaRepository {
    pub fn new(documents: Vec<SourceSchemaDocument>) -> Self {
        Self { documents }
    }

    /// Parse a JSON array of schema documents.
    pub fn from_json(json: &str) -> ConnectorResult<Self> {
        let documents: Vec<SourceSchemaDocument> = serde_json::from_str(json)
            .map_err(|e| ConnectorError::schema_unavailable(format!("invalid schema listing: {}", e)))?;
        Ok(Self::new(documents))
    }
}

impl SchemaRepository for DiscoveredSchemaRepository {
    async fn get_schema(&self) -> ConnectorResult<Schema> {
        discover_account_schema(&self.documents)
    }
}

/// Memoizes the first successfully fetched schema of an inner repository.
///
/// Shared safely across concurrent callers; failures are not cached.
#[derive(Debug, Clone)]
pub struct CachedSchemaRepository<R: SchemaRepository> {
    inner: R,
    cached: Arc<RwLock<Option<Schema>>>,
}

impl<R: SchemaRepository> CachedSchemaRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Drop the cached schema so the next call refetches it.
    pub async fn invalidate(&self) {
        let mut guard = self.cached.write().await;
        *guard = None;
    }
}

impl<R: SchemaRepository> SchemaRepository for CachedSchemaRepository<R> {
    async fn get_schema(&self) -> ConnectorResult<Schema> {
        if let Some(schema) = self.cached.read().await.as_ref() {
            trace!("Serving account schema from cache");
            return Ok(schema.clone());
        }

        let mut guard = self.cached.write().await;
        // Another caller may have filled the cache while we waited for the lock.
        if let Some(schema) = guard.as_ref() {
            return Ok(schema.clone());
        }

        let schema = self.inner.get_schema().await?;
        debug!("Caching account schema with {} attributes", schema.attributes.len());
        *guard = Some(schema.clone());
        Ok(schema)
    }
}
