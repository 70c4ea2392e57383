//! Attribute projection.
//!
//! Maps a vendor record onto the account schema: every declared attribute is
//! copied (or set to null when the record lacks it) and the record's source
//! id is carried as the synthetic `accountID` attribute.

use super::types::{AttributeBag, RawRecord};
use crate::schema::{ACCOUNT_ID_ATTRIBUTE, Schema};
use serde_json::Value;

/// Project a raw record into a schema-conformant attribute bag.
///
/// The result's key set is exactly the schema's attribute names plus
/// `accountID`. Attributes the record does not carry are present as null.
///
/// ```rust
/// use iga_connector::account::{RawRecord, project};
/// use iga_connector::schema::{Schema, SchemaAttribute};
/// use serde_json::json;
///
/// let schema = Schema::new("id", "name")
///     .with_attribute(SchemaAttribute::new("id"))
///     .with_attribute(SchemaAttribute::new("name"));
/// let raw = RawRecord::from_value("5", json!({"id": "5"}));
///
/// let projected = project(&raw, &schema);
/// assert_eq!(serde_json::Value::Object(projected), json!({"id": "5", "name": null, "accountID": "5"}));
/// ```
pub fn project(raw: &RawRecord, schema: &Schema) -> AttributeBag {
    let mut projected: AttributeBag = schema
        .attribute_names()
        .map(|name| {
            let value = raw.attributes.get(name).cloned().unwrap_or(Value::Null);
            (name.to_string(), value)
        })
        .collect();

    projected.insert(
        ACCOUNT_ID_ATTRIBUTE.to_string(),
        Value::String(raw.id.clone()),
    );
    projected
}
