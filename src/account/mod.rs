//! Schema-driven account projection and change application.
//!
//! Everything in this module is a pure function of its inputs: no state is
//! kept between calls and the caller's values are never mutated, so any of
//! these functions can run concurrently for many accounts.
//!
//! # Key Functions
//!
//! - [`project`] - raw vendor record to schema-conformant attribute bag
//! - [`apply_changes`] - fold Set/Add/Remove changes over an attribute bag
//! - [`materialize`] - attribute bag to [`NormalizedAccount`]
//! - [`prepare_create`] - shape an account creation request
//!
//! # Examples
//!
//! ```rust
//! use iga_connector::account::{AttributeChange, IdentityHints, RawRecord, apply_changes, materialize, project};
//! use iga_connector::schema::{Schema, SchemaAttribute};
//! use serde_json::json;
//!
//! let schema = Schema::new("id", "name")
//!     .with_attribute(SchemaAttribute::new("id"))
//!     .with_attribute(SchemaAttribute::new("name"))
//!     .with_attribute(SchemaAttribute::new("groups").multi_valued().entitlement());
//!
//! let raw = RawRecord::from_value("a-1", json!({"id": "jdoe", "name": "J. Doe", "groups": ["a", "b"]}));
//! let current = project(&raw, &schema);
//!
//! let outcome = apply_changes(&current, &[AttributeChange::add("groups", json!(["b", "c"]))], &schema);
//! assert_eq!(outcome.attributes["groups"], json!(["a", "b", "c"]));
//!
//! let account = materialize(outcome.attributes, &schema, &IdentityHints::none());
//! assert_eq!(account.identity_value, json!("jdoe"));
//! ```

pub mod changes;
pub mod create;
pub mod materializer;
pub mod projector;
pub mod types;

pub use changes::{
    AttributeChange, ChangeDiagnostic, ChangeOp, ChangeOutcome, DiagnosticKind, apply_changes,
};
pub use create::{AccountCreateOutput, AccountKey, CreatePlan, SimpleKey, prepare_create};
pub use materializer::{IdentityHints, materialize};
pub use projector::project;
pub use types::{AttributeBag, Entitlement, NormalizedAccount, RawEntitlement, RawRecord};
