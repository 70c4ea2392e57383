//! Record and account value types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A schema-driven attribute bag: attribute name to value.
///
/// Absent attributes are stored as explicit `Value::Null` entries.
pub type AttributeBag = Map<String, Value>;

/// A record as returned by the source, before projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Source-side id of the record
    pub id: String,
    /// Vendor attributes, not necessarily matching the schema
    #[serde(default)]
    pub attributes: AttributeBag,
}

impl RawRecord {
    pub fn new(id: impl Into<String>, attributes: AttributeBag) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    /// Build a record from a JSON object; non-object values yield an empty bag.
    pub fn from_value(id: impl Into<String>, attributes: Value) -> Self {
        let attributes = match attributes {
            Value::Object(map) => map,
            _ => AttributeBag::new(),
        };
        Self::new(id, attributes)
    }
}

/// A fully normalized account, ready to hand to the governance platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAccount {
    /// Canonical identity value
    #[serde(rename = "identity")]
    pub identity_value: Value,
    /// Human-readable label
    #[serde(rename = "uuid")]
    pub display_value: Value,
    /// Full attribute bag, including the synthetic `accountID`
    pub attributes: AttributeBag,
}

/// An entitlement as listed by the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entitlement {
    /// Entitlement type requested by the platform (e.g. `group`)
    #[serde(rename = "type")]
    pub entitlement_type: String,
    /// Entitlement value
    pub identity: Value,
    /// Entitlement name
    pub uuid: Value,
    #[serde(default)]
    pub attributes: AttributeBag,
}

/// An entitlement record as returned by the source, before tagging with a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntitlement {
    pub value: Value,
    pub name: Value,
    #[serde(default)]
    pub attributes: AttributeBag,
}

impl RawEntitlement {
    /// Tag the entitlement with the type the platform asked for.
    pub fn into_entitlement(self, entitlement_type: &str) -> Entitlement {
        Entitlement {
            entitlement_type: entitlement_type.to_string(),
            identity: self.value,
            uuid: self.name,
            attributes: self.attributes,
        }
    }
}
