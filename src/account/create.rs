//! Shaping of account creation requests.
//!
//! A create request carries whatever attributes the platform decided to
//! provision. Only schema-declared attributes are forwarded to the source,
//! multi-valued entitlements are always sent as lists, and the identity
//! attribute is always populated.

use super::materializer::IdentityHints;
use super::types::AttributeBag;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity attribute assumed when the schema does not name one.
pub const DEFAULT_IDENTITY_ATTRIBUTE: &str = "id";

/// Simple key identifying an account to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleKey {
    pub id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountKey {
    pub simple: SimpleKey,
}

/// Response returned to the platform after a create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountCreateOutput {
    pub key: AccountKey,
    pub attributes: AttributeBag,
    pub disabled: bool,
    pub locked: bool,
}

/// The outgoing payload for the source and the response for the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePlan {
    /// Attributes sent to the source
    pub payload: AttributeBag,
    /// Response handed back to the platform once the source accepted the payload
    pub output: AccountCreateOutput,
}

/// Build the create payload and response from a create request.
pub fn prepare_create(
    requested: &AttributeBag,
    schema: &Schema,
    hints: &IdentityHints,
) -> CreatePlan {
    let identity_attribute = if schema.identity_attribute.is_empty() {
        DEFAULT_IDENTITY_ATTRIBUTE
    } else {
        schema.identity_attribute.as_str()
    };
    let identity_value = hints.resolve(requested, identity_attribute);

    let mut attributes = AttributeBag::new();
    for attr in &schema.attributes {
        let Some(value) = requested.get(&attr.name) else {
            continue;
        };

        let shaped = match value {
            Value::Array(_) => value.clone(),
            scalar if attr.is_multi_valued_entitlement() => Value::Array(vec![scalar.clone()]),
            other => other.clone(),
        };
        attributes.insert(attr.name.clone(), shaped);
    }
    attributes.insert(identity_attribute.to_string(), identity_value.clone());

    CreatePlan {
        payload: attributes.clone(),
        output: AccountCreateOutput {
            key: AccountKey {
                simple: SimpleKey { id: identity_value },
            },
            attributes,
            disabled: false,
            locked: false,
        },
    }
}
