//! Core schema type definitions for governed accounts.
//!
//! A [`Schema`] is the normalized account schema of a source: which attribute
//! identifies an account, which one labels it, and the ordered list of
//! attributes every projected account carries.

use crate::error::{ConnectorError, ConnectorResult};
use serde::{Deserialize, Serialize};

/// Name of the synthetic attribute carrying the source-side account id.
pub const ACCOUNT_ID_ATTRIBUTE: &str = "accountID";

/// A normalized account schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Attribute holding the canonical unique identifier of an account
    pub identity_attribute: String,
    /// Attribute used as the human-readable label of an account
    pub display_attribute: String,
    /// Attribute carrying group membership, if the source declares one
    #[serde(default)]
    pub group_attribute: Option<String>,
    /// Ordered attribute definitions; names are unique
    #[serde(default)]
    pub attributes: Vec<SchemaAttribute>,
}

impl Schema {
    /// Create a schema with no attributes.
    pub fn new(identity_attribute: impl Into<String>, display_attribute: impl Into<String>) -> Self {
        Self {
            identity_attribute: identity_attribute.into(),
            display_attribute: display_attribute.into(),
            group_attribute: None,
            attributes: Vec::new(),
        }
    }

    /// Append an attribute definition.
    pub fn with_attribute(mut self, attribute: SchemaAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Iterate over the declared attribute names in schema order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|attr| attr.name.as_str())
    }

    /// Look up an attribute definition by name.
    pub fn attribute(&self, name: &str) -> Option<&SchemaAttribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Whether the schema declares an attribute with this name.
    pub fn declares(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Returns the first attribute name declared more than once, if any.
    pub fn duplicate_attribute(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::new();
        self.attribute_names().find(|name| !seen.insert(*name))
    }

    /// Reject schemas declaring an attribute name more than once.
    pub fn validate(&self) -> ConnectorResult<()> {
        match self.duplicate_attribute() {
            Some(duplicate) => Err(ConnectorError::schema_unavailable(format!(
                "attribute '{}' is declared more than once",
                duplicate
            ))),
            None => Ok(()),
        }
    }
}

/// Definition of a single schema attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaAttribute {
    /// Attribute name
    pub name: String,
    /// Lower-cased data type name (`string`, `boolean`, `int`, ...)
    #[serde(rename = "type", default = "default_type")]
    pub data_type: String,
    /// Whether the attribute holds a list of values
    #[serde(rename = "multi", alias = "multiValued", default)]
    pub multi_valued: bool,
    /// Whether the attribute represents entitlement membership
    #[serde(rename = "entitlement", alias = "isEntitlement", default)]
    pub is_entitlement: bool,
    /// Whether the attribute is the managed group attribute
    #[serde(rename = "managed", alias = "isGroup", default)]
    pub is_group: bool,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
}

fn default_type() -> String {
    "string".to_string()
}

impl SchemaAttribute {
    /// Create a single-valued string attribute described by its own name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: name.clone(),
            name,
            data_type: default_type(),
            multi_valued: false,
            is_entitlement: false,
            is_group: false,
        }
    }

    /// Set the data type name.
    pub fn with_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = data_type.into();
        self
    }

    /// Mark the attribute multi-valued.
    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    /// Mark the attribute as an entitlement.
    pub fn entitlement(mut self) -> Self {
        self.is_entitlement = true;
        self
    }

    /// Mark the attribute as the managed group attribute.
    pub fn group(mut self) -> Self {
        self.is_group = true;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Multi-valued entitlements are the attributes Add/Remove are meant for.
    pub fn is_multi_valued_entitlement(&self) -> bool {
        self.is_entitlement && self.multi_valued
    }
}
