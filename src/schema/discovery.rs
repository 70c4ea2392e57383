//! Normalization of discovered source schemas.
//!
//! The governance platform describes each source with a listing of schema
//! documents (`account`, `group`, ...). Only the `account` document feeds the
//! projection engine; the others are referenced by it and must exist on the
//! target source before the account schema is usable.

use super::types::{ACCOUNT_ID_ATTRIBUTE, Schema, SchemaAttribute};
use crate::error::{ConnectorError, ConnectorResult};
use log::debug;
use serde::{Deserialize, Serialize};

/// Name of the schema document describing accounts.
pub const ACCOUNT_SCHEMA_NAME: &str = "account";

/// A schema document as reported by the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSchemaDocument {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub identity_attribute: Option<String>,
    #[serde(default)]
    pub display_attribute: Option<String>,
    #[serde(default)]
    pub attributes: Vec<SourceAttribute>,
}

/// An attribute entry of a source schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAttribute {
    pub name: String,
    #[serde(rename = "type", default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub is_multi: bool,
    #[serde(default)]
    pub is_entitlement: bool,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Pick the account schema out of a source's schema listing.
pub fn select_account_schema(
    documents: &[SourceSchemaDocument],
) -> ConnectorResult<&SourceSchemaDocument> {
    documents
        .iter()
        .find(|doc| doc.name == ACCOUNT_SCHEMA_NAME)
        .ok_or_else(|| {
            ConnectorError::schema_unavailable("source does not declare an 'account' schema")
        })
}

/// Schema documents the account schema depends on, i.e. every non-account
/// document that carries an id.
pub fn referenced_schemas(documents: &[SourceSchemaDocument]) -> Vec<&SourceSchemaDocument> {
    documents
        .iter()
        .filter(|doc| doc.name != ACCOUNT_SCHEMA_NAME && doc.id.is_some())
        .collect()
}

/// Convert a source account schema document into a normalized [`Schema`].
pub fn normalize_account_schema(document: &SourceSchemaDocument) -> ConnectorResult<Schema> {
    let group_attribute = document
        .attributes
        .iter()
        .find(|attr| attr.is_group)
        .map(|attr| attr.name.clone());

    let mut attributes: Vec<SchemaAttribute> =
        document.attributes.iter().map(normalize_attribute).collect();

    if !attributes.iter().any(|attr| attr.name == ACCOUNT_ID_ATTRIBUTE) {
        attributes.push(
            SchemaAttribute::new(ACCOUNT_ID_ATTRIBUTE)
                .with_description("Account ID from the source"),
        );
    }

    let schema = Schema {
        identity_attribute: document.identity_attribute.clone().unwrap_or_default(),
        display_attribute: document.display_attribute.clone().unwrap_or_default(),
        group_attribute,
        attributes,
    };

    schema.validate()?;

    debug!(
        "Normalized account schema with {} attributes (identity: '{}', display: '{}')",
        schema.attributes.len(),
        schema.identity_attribute,
        schema.display_attribute
    );

    Ok(schema)
}

/// Select and normalize the account schema from a full listing.
pub fn discover_account_schema(documents: &[SourceSchemaDocument]) -> ConnectorResult<Schema> {
    normalize_account_schema(select_account_schema(documents)?)
}

fn normalize_attribute(source: &SourceAttribute) -> SchemaAttribute {
    let description = source
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(&source.name)
        .to_string();

    SchemaAttribute {
        name: source.name.clone(),
        data_type: source
            .data_type
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_else(|| "string".to_string()),
        multi_valued: source.is_multi,
        is_entitlement: source.is_entitlement,
        is_group: source.is_group,
        description,
    }
}
