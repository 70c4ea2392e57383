//! Change-set application.
//!
//! Folds an ordered list of [`AttributeChange`]s over a baseline attribute
//! bag. Changes compose in order, each acting on the result of the previous
//! one. A change that cannot be applied is reported as a [`ChangeDiagnostic`]
//! and skipped; it never aborts the batch.
//!
//! Operation semantics:
//!
//! - `Set` replaces the value wholesale.
//! - `Add` requires the current value to be a list. A list value is merged as
//!   an ordered set-union, a scalar is appended when not already present.
//!   Adding to a non-list leaves the attribute unchanged.
//! - `Remove` filters the given value(s) out of a list. On a non-list the
//!   attribute is cleared to null, whatever the value.

use super::types::AttributeBag;
use crate::schema::Schema;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Operation carried by an [`AttributeChange`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChangeOp {
    Set,
    Add,
    Remove,
    /// Any operation name the connector does not understand
    Unknown(String),
}

impl From<String> for ChangeOp {
    fn from(op: String) -> Self {
        match op.as_str() {
            "Set" => ChangeOp::Set,
            "Add" => ChangeOp::Add,
            "Remove" => ChangeOp::Remove,
            _ => ChangeOp::Unknown(op),
        }
    }
}

impl From<&str> for ChangeOp {
    fn from(op: &str) -> Self {
        ChangeOp::from(op.to_string())
    }
}

impl From<ChangeOp> for String {
    fn from(op: ChangeOp) -> Self {
        op.to_string()
    }
}

impl fmt::Display for ChangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeOp::Set => write!(f, "Set"),
            ChangeOp::Add => write!(f, "Add"),
            ChangeOp::Remove => write!(f, "Remove"),
            ChangeOp::Unknown(op) => write!(f, "{}", op),
        }
    }
}

/// A single attribute modification requested by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeChange {
    pub attribute: String,
    pub op: ChangeOp,
    #[serde(default)]
    pub value: Value,
}

impl AttributeChange {
    pub fn new(attribute: impl Into<String>, op: impl Into<ChangeOp>, value: Value) -> Self {
        Self {
            attribute: attribute.into(),
            op: op.into(),
            value,
        }
    }

    pub fn set(attribute: impl Into<String>, value: Value) -> Self {
        Self::new(attribute, ChangeOp::Set, value)
    }

    pub fn add(attribute: impl Into<String>, value: Value) -> Self {
        Self::new(attribute, ChangeOp::Add, value)
    }

    pub fn remove(attribute: impl Into<String>, value: Value) -> Self {
        Self::new(attribute, ChangeOp::Remove, value)
    }
}

/// Why a change was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The operation name is not one of Set, Add, Remove
    UnknownOperation { op: String },
    /// Add targeted an attribute whose current value is not a list
    AddToNonList,
}

/// Report of a change that was skipped while folding a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeDiagnostic {
    /// Position of the change in the batch
    pub index: usize,
    pub attribute: String,
    pub kind: DiagnosticKind,
}

impl fmt::Display for ChangeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnknownOperation { op } => write!(
                f,
                "change #{}: unknown operation '{}' on attribute '{}'",
                self.index, op, self.attribute
            ),
            DiagnosticKind::AddToNonList => write!(
                f,
                "change #{}: cannot add to non-array attribute '{}'",
                self.index, self.attribute
            ),
        }
    }
}

/// Result of folding a change batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeOutcome {
    /// The new attribute state
    pub attributes: AttributeBag,
    /// Changes that were skipped, in batch order
    pub diagnostics: Vec<ChangeDiagnostic>,
}

impl ChangeOutcome {
    /// True when every change in the batch was applied.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Apply `changes` in order on top of `baseline`.
///
/// `baseline` is left untouched. After the fold every attribute declared by
/// `schema` is present in the result, back-filled from `baseline` (or null)
/// when the fold never produced it.
pub fn apply_changes(
    baseline: &AttributeBag,
    changes: &[AttributeChange],
    schema: &Schema,
) -> ChangeOutcome {
    let mut attributes = baseline.clone();
    let mut diagnostics = Vec::new();

    for (index, change) in changes.iter().enumerate() {
        if let Some(kind) = apply_change(&mut attributes, change) {
            let diagnostic = ChangeDiagnostic {
                index,
                attribute: change.attribute.clone(),
                kind,
            };
            warn!("Skipping {}", diagnostic);
            diagnostics.push(diagnostic);
        }
    }

    for name in schema.attribute_names() {
        if !attributes.contains_key(name) {
            let value = baseline.get(name).cloned().unwrap_or(Value::Null);
            attributes.insert(name.to_string(), value);
        }
    }

    debug!(
        "Applied {} of {} changes",
        changes.len() - diagnostics.len(),
        changes.len()
    );

    ChangeOutcome {
        attributes,
        diagnostics,
    }
}

/// Apply one change to the accumulator, returning why it was skipped if it was.
fn apply_change(attributes: &mut AttributeBag, change: &AttributeChange) -> Option<DiagnosticKind> {
    let current = attributes.get(&change.attribute);

    let next = match &change.op {
        ChangeOp::Set => change.value.clone(),
        ChangeOp::Add => match current {
            Some(Value::Array(items)) => Value::Array(add_values(items, &change.value)),
            _ => return Some(DiagnosticKind::AddToNonList),
        },
        ChangeOp::Remove => match current {
            Some(Value::Array(items)) => Value::Array(remove_values(items, &change.value)),
            _ => Value::Null,
        },
        ChangeOp::Unknown(op) => {
            return Some(DiagnosticKind::UnknownOperation { op: op.clone() });
        }
    };

    attributes.insert(change.attribute.clone(), next);
    None
}

fn add_values(current: &[Value], value: &Value) -> Vec<Value> {
    match value {
        Value::Array(additions) => {
            let mut merged: Vec<Value> = Vec::with_capacity(current.len() + additions.len());
            for item in current.iter().chain(additions) {
                if !merged.contains(item) {
                    merged.push(item.clone());
                }
            }
            merged
        }
        scalar => {
            let mut merged = current.to_vec();
            if !merged.contains(scalar) {
                merged.push(scalar.clone());
            }
            merged
        }
    }
}

fn remove_values(current: &[Value], value: &Value) -> Vec<Value> {
    match value {
        Value::Array(removals) => current
            .iter()
            .filter(|item| !removals.contains(item))
            .cloned()
            .collect(),
        scalar => current.iter().filter(|item| *item != scalar).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaAttribute;
    use serde_json::json;

    fn bag(value: Value) -> AttributeBag {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn schema() -> Schema {
        Schema::new("id", "name")
            .with_attribute(SchemaAttribute::new("id"))
            .with_attribute(SchemaAttribute::new("status"))
            .with_attribute(SchemaAttribute::new("groups").multi_valued().entitlement())
    }

    #[test]
    fn test_add_list_is_deduplicated_union() {
        let baseline = bag(json!({"groups": ["a", "b"]}));
        let outcome = apply_changes(
            &baseline,
            &[AttributeChange::add("groups", json!(["b", "c"]))],
            &schema(),
        );

        assert!(outcome.is_clean());
        assert_eq!(outcome.attributes["groups"], json!(["a", "b", "c"]));
    }

    #[test]
    fn test_add_list_collapses_duplicates_on_both_sides() {
        let baseline = bag(json!({"groups": ["a", "a"]}));
        let outcome = apply_changes(
            &baseline,
            &[AttributeChange::add("groups", json!(["c", "c", "a"]))],
            &schema(),
        );
        assert_eq!(outcome.attributes["groups"], json!(["a", "c"]));
    }

    #[test]
    fn test_add_scalar_appends_once() {
        let baseline = bag(json!({"groups": ["a"]}));
        let changes = [
            AttributeChange::add("groups", json!("b")),
            AttributeChange::add("groups", json!("b")),
            AttributeChange::add("groups", json!("a")),
        ];
        let outcome = apply_changes(&baseline, &changes, &schema());
        assert_eq!(outcome.attributes["groups"], json!(["a", "b"]));
    }

    #[test]
    fn test_add_to_non_list_is_reported_and_skipped() {
        let baseline = bag(json!({"status": "active"}));
        let outcome = apply_changes(
            &baseline,
            &[AttributeChange::add("status", json!("locked"))],
            &schema(),
        );

        assert_eq!(outcome.attributes["status"], json!("active"));
        assert_eq!(
            outcome.diagnostics,
            vec![ChangeDiagnostic {
                index: 0,
                attribute: "status".to_string(),
                kind: DiagnosticKind::AddToNonList,
            }]
        );
    }

    #[test]
    fn test_add_to_missing_attribute_is_not_converted() {
        let outcome = apply_changes(
            &AttributeBag::new(),
            &[AttributeChange::add("groups", json!(["a"]))],
            &schema(),
        );
        assert_eq!(outcome.attributes["groups"], Value::Null);
        assert_eq!(outcome.diagnostics.len(), 1);
    }

    #[test]
    fn test_remove_scalar_from_non_list_clears() {
        let baseline = bag(json!({"status": "active"}));
        let outcome = apply_changes(
            &baseline,
            &[AttributeChange::remove("status", json!("active"))],
            &schema(),
        );
        assert!(outcome.is_clean());
        assert_eq!(outcome.attributes["status"], Value::Null);
    }

    #[test]
    fn test_remove_from_non_list_clears_regardless_of_value() {
        let baseline = bag(json!({"status": "active"}));
        let outcome = apply_changes(
            &baseline,
            &[AttributeChange::remove("status", json!(["something", "else"]))],
            &schema(),
        );
        assert_eq!(outcome.attributes["status"], Value::Null);
    }

    #[test]
    fn test_remove_list_and_scalar_from_list() {
        let baseline = bag(json!({"groups": ["a", "b", "c", "b"]}));
        let outcome = apply_changes(
            &baseline,
            &[
                AttributeChange::remove("groups", json!("b")),
                AttributeChange::remove("groups", json!(["c", "zzz"])),
            ],
            &schema(),
        );
        assert_eq!(outcome.attributes["groups"], json!(["a"]));
    }

    #[test]
    fn test_set_then_remove_on_scalar_yields_null() {
        let baseline = bag(json!({"status": "active"}));
        let outcome = apply_changes(
            &baseline,
            &[
                AttributeChange::set("status", json!("suspended")),
                AttributeChange::remove("status", json!("suspended")),
            ],
            &schema(),
        );
        assert_eq!(outcome.attributes["status"], Value::Null);
    }

    #[test]
    fn test_set_replaces_lists_wholesale() {
        let baseline = bag(json!({"groups": ["a", "b"]}));
        let outcome = apply_changes(
            &baseline,
            &[AttributeChange::set("groups", json!(["z"]))],
            &schema(),
        );
        assert_eq!(outcome.attributes["groups"], json!(["z"]));
    }

    #[test]
    fn test_unknown_operation_leaves_bag_unchanged() {
        let baseline = bag(json!({"id": "7", "status": "active", "groups": ["a"]}));
        let outcome = apply_changes(
            &baseline,
            &[AttributeChange::new("status", "Foo", json!("x"))],
            &schema(),
        );

        assert_eq!(outcome.attributes, baseline);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(
            outcome.diagnostics[0].kind,
            DiagnosticKind::UnknownOperation {
                op: "Foo".to_string()
            }
        );
    }

    #[test]
    fn test_bad_change_does_not_block_batch() {
        let baseline = bag(json!({"status": "active", "groups": ["a"]}));
        let changes = [
            AttributeChange::new("groups", "Replace", json!(["x"])),
            AttributeChange::add("status", json!("x")),
            AttributeChange::add("groups", json!("b")),
        ];
        let outcome = apply_changes(&baseline, &changes, &schema());

        assert_eq!(outcome.attributes["groups"], json!(["a", "b"]));
        let indexes: Vec<usize> = outcome.diagnostics.iter().map(|d| d.index).collect();
        assert_eq!(indexes, vec![0, 1]);
    }

    #[test]
    fn test_schema_attributes_are_backfilled() {
        let baseline = bag(json!({"id": "7"}));
        let outcome = apply_changes(
            &baseline,
            &[AttributeChange::set("status", json!("active"))],
            &schema(),
        );

        assert_eq!(outcome.attributes["id"], json!("7"));
        assert_eq!(outcome.attributes["status"], json!("active"));
        assert!(outcome.attributes.contains_key("groups"));
        assert_eq!(outcome.attributes["groups"], Value::Null);
    }

    #[test]
    fn test_baseline_is_not_mutated() {
        let baseline = bag(json!({"groups": ["a"]}));
        let snapshot = baseline.clone();
        let _ = apply_changes(
            &baseline,
            &[AttributeChange::add("groups", json!("b"))],
            &schema(),
        );
        assert_eq!(baseline, snapshot);
    }

    #[test]
    fn test_change_op_serde() {
        let change: AttributeChange =
            serde_json::from_value(json!({"attribute": "groups", "op": "Add", "value": ["a"]}))
                .unwrap();
        assert_eq!(change.op, ChangeOp::Add);

        let unknown: AttributeChange =
            serde_json::from_value(json!({"attribute": "groups", "op": "Foo"})).unwrap();
        assert_eq!(unknown.op, ChangeOp::Unknown("Foo".to_string()));
        assert_eq!(unknown.value, Value::Null);

        let serialized = serde_json::to_value(&AttributeChange::remove("g", json!(1))).unwrap();
        assert_eq!(serialized["op"], "Remove");
    }
}
