//! Lifecycle connector.
//!
//! Routes the platform's standard account and entitlement operations to the
//! record store and the projection engine in [`crate::account`].
//!
//! # Examples
//!
//! ```rust
//! use iga_connector::connector::Connector;
//! use iga_connector::schema::{Schema, SchemaAttribute, StaticSchemaRepository};
//! use iga_connector::storage::{InMemoryRecordStore, RecordStore};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::new("id", "name")
//!     .with_attribute(SchemaAttribute::new("id"))
//!     .with_attribute(SchemaAttribute::new("name"));
//! let store = InMemoryRecordStore::new("id");
//! store.create_account(json!({"id": "jdoe", "name": "John"}).as_object().cloned().unwrap()).await?;
//!
//! let connector = Connector::new(StaticSchemaRepository::new(schema), store);
//! let account = connector.account_read("jdoe").await?;
//! assert_eq!(account.display_value, json!("John"));
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod core;
pub mod dispatch;
pub mod entitlements;


pub use accounts::AccountUpdateOutput;
pub use core::{Connector, TestConnectionOutput};
pub use dispatch::{
    AccountKeyInput, CommandOptions, CommandResponse, ConnectorCommand, SimpleKeyInput,
};
