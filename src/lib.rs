//! Identity-governance account connector library for Rust.
//!
//! Normalizes account and entitlement records of a governed source against a
//! dynamically discovered schema, and applies incremental attribute changes
//! idempotently.
//!
//! # Core Components
//!
//! - [`account`] - pure projection, change application and materialization
//! - [`schema`] - normalized account schema and schema repositories
//! - [`storage`] - record store trait, in-memory store and retry policy
//! - [`Connector`] - lifecycle operations wired over the collaborators
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use iga_connector::{Connector, ConnectorConfig};
//! use iga_connector::schema::DiscoveredSchemaRepository;
//! use iga_connector::storage::InMemoryRecordStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConnectorConfig::from_env()?;
//! let schemas = DiscoveredSchemaRepository::from_json(&std::fs::read_to_string("schemas.json")?)?;
//! let connector = Connector::from_config(&config, schemas, InMemoryRecordStore::new("id"))?;
//!
//! for account in connector.account_list().await? {
//!     println!("{}", account.identity_value);
//! }
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod config;
pub mod connector;
pub mod error;
pub mod schema;
pub mod storage;

// Re-export commonly used types for convenience
pub use account::{
    AttributeBag, AttributeChange, ChangeOp, ChangeOutcome, IdentityHints, NormalizedAccount,
    RawRecord, apply_changes, materialize, project,
};
pub use config::ConnectorConfig;
pub use connector::{CommandResponse, Connector, ConnectorCommand};
pub use error::{ConnectorError, ConnectorResult};
pub use schema::{Schema, SchemaAttribute, SchemaRepository};
pub use storage::{RecordStore, RetryPolicy, StoreError};
