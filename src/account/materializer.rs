//! Account materialization.

use super::types::{AttributeBag, NormalizedAccount};
use crate::schema::Schema;
use serde_json::Value;

/// Caller-supplied candidates for an account's identity value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityHints {
    /// Key supplied explicitly by the platform's request
    pub explicit_key: Option<Value>,
    /// Last-resort identity, typically the identity the request targeted
    pub fallback: Option<Value>,
}

impl IdentityHints {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_explicit_key(mut self, key: impl Into<Value>) -> Self {
        self.explicit_key = Some(key.into());
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<Value>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Resolve the identity value: explicit key, then the schema's identity
    /// attribute, then the fallback. Null and empty strings do not count.
    pub fn resolve(&self, attributes: &AttributeBag, identity_attribute: &str) -> Value {
        self.explicit_key
            .as_ref()
            .filter(|value| is_present(value))
            .or_else(|| attributes.get(identity_attribute).filter(|value| is_present(value)))
            .or_else(|| self.fallback.as_ref().filter(|value| is_present(value)))
            .cloned()
            .unwrap_or(Value::Null)
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Assemble a [`NormalizedAccount`] from an attribute bag.
pub fn materialize(attributes: AttributeBag, schema: &Schema, hints: &IdentityHints) -> NormalizedAccount {
    let identity_value = hints.resolve(&attributes, &schema.identity_attribute);
    let display_value = attributes
        .get(&schema.display_attribute)
        .cloned()
        .unwrap_or(Value::Null);

    NormalizedAccount {
        identity_value,
        display_value,
        attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> AttributeBag {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_identity_and_display_from_attributes() {
        let schema = Schema::new("id", "name");
        let account = materialize(
            bag(json!({"id": "jdoe", "name": "John Doe", "accountID": "a1"})),
            &schema,
            &IdentityHints::none(),
        );

        assert_eq!(account.identity_value, json!("jdoe"));
        assert_eq!(account.display_value, json!("John Doe"));
        assert_eq!(account.attributes["accountID"], json!("a1"));
    }

    #[test]
    fn test_explicit_key_wins() {
        let schema = Schema::new("id", "name");
        let hints = IdentityHints::none()
            .with_explicit_key("from-key")
            .with_fallback("from-fallback");
        let account = materialize(bag(json!({"id": "jdoe"})), &schema, &hints);
        assert_eq!(account.identity_value, json!("from-key"));
    }

    #[test]
    fn test_fallback_used_when_attribute_missing_or_empty() {
        let schema = Schema::new("id", "name");
        let hints = IdentityHints::none().with_fallback("fallback");

        let missing = materialize(AttributeBag::new(), &schema, &hints);
        assert_eq!(missing.identity_value, json!("fallback"));

        let empty = materialize(bag(json!({"id": ""})), &schema, &hints);
        assert_eq!(empty.identity_value, json!("fallback"));

        let empty_key = IdentityHints::none().with_explicit_key("").with_fallback("fallback");
        let account = materialize(bag(json!({"id": null})), &schema, &empty_key);
        assert_eq!(account.identity_value, json!("fallback"));
    }

    #[test]
    fn test_missing_display_is_null() {
        let schema = Schema::new("id", "displayName");
        let account = materialize(bag(json!({"id": "x"})), &schema, &IdentityHints::none());
        assert_eq!(account.display_value, Value::Null);
    }

    #[test]
    fn test_serialized_shape() {
        let schema = Schema::new("id", "name");
        let account = materialize(
            bag(json!({"id": "x", "name": "X"})),
            &schema,
            &IdentityHints::none(),
        );
        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value, json!({"identity": "x", "uuid": "X", "attributes": {"id": "x", "name": "X"}}));
    }
}
