//! Account schema model, discovery normalization and repositories.
//!
//! # Key Types
//!
//! - [`Schema`] - normalized account schema consumed by the projection engine
//! - [`SchemaAttribute`] - a single attribute definition
//! - [`SchemaRepository`] - supplier of the schema for a connector session
//!
//! # Examples
//!
//! ```rust
//! use iga_connector::schema::{Schema, SchemaAttribute};
//!
//! let schema = Schema::new("id", "name")
//!     .with_attribute(SchemaAttribute::new("id"))
//!     .with_attribute(SchemaAttribute::new("name"))
//!     .with_attribute(SchemaAttribute::new("groups").multi_valued().entitlement());
//! assert!(schema.declares("groups"));
//! ```

pub mod discovery;
pub mod repository;
pub mod types;


pub use discovery::{
    SourceAttribute, SourceSchemaDocument, discover_account_schema, normalize_account_schema,
    referenced_schemas, select_account_schema,
};
pub use repository::{
    CachedSchemaRepository, DiscoveredSchemaRepository, SchemaRepository, StaticSchemaRepository,
};
pub use types::{ACCOUNT_ID_ATTRIBUTE, Schema, SchemaAttribute};
