//! Common test utilities for connector integration tests.
//!
//! Provides schema fixtures, attribute bag builders and a record store that
//! fails transiently a configurable number of times before delegating.

#![allow(dead_code)]

use chrono::Utc;
use iga_connector::account::{AttributeBag, RawEntitlement, RawRecord};
use iga_connector::schema::{Schema, SchemaAttribute};
use iga_connector::storage::{
    InMemoryRecordStore, RecordStore, StoreError, StoreResult, parse_retry_after,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Initialize logging once for the test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build an attribute bag from a JSON object literal.
pub fn bag(value: Value) -> AttributeBag {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// Account schema used across integration tests.
pub fn account_schema() -> Schema {
    Schema::new("id", "displayName")
        .with_attribute(SchemaAttribute::new("id"))
        .with_attribute(SchemaAttribute::new("displayName"))
        .with_attribute(SchemaAttribute::new("email"))
        .with_attribute(
            SchemaAttribute::new("groups")
                .multi_valued()
                .entitlement()
                .group(),
        )
        .with_attribute(SchemaAttribute::new("IIQDisabled").with_type("boolean"))
}

/// Source schema listing as reported by the platform for the account schema above.
pub fn source_schema_listing() -> Value {
    json!([
        {
            "id": "group-schema-id",
            "name": "group",
            "identityAttribute": "value",
            "displayAttribute": "name",
            "attributes": [{"name": "value", "type": "STRING"}, {"name": "name", "type": "STRING"}]
        },
        {
            "id": "account-schema-id",
            "name": "account",
            "identityAttribute": "id",
            "displayAttribute": "displayName",
            "attributes": [
                {"name": "id", "type": "STRING"},
                {"name": "displayName", "type": "STRING"},
                {"name": "email", "type": "STRING"},
                {"name": "groups", "type": "STRING", "isMulti": true, "isEntitlement": true, "isGroup": true},
                {"name": "IIQDisabled", "type": "BOOLEAN"}
            ]
        }
    ])
}

/// In-memory store seeded with a few accounts and entitlements.
pub async fn seeded_store() -> InMemoryRecordStore {
    let store = InMemoryRecordStore::new("id");
    for (id, name, groups) in [
        ("alice", "Alice Liddell", json!(["admins", "staff"])),
        ("bob", "Bob Builder", json!(["staff"])),
        ("carol", "Carol Danvers", json!([])),
    ] {
        store
            .create_account(bag(json!({
                "id": id,
                "displayName": name,
                "email": format!("{}@example.com", id),
                "groups": groups,
                "IIQDisabled": false
            })))
            .await
            .expect("seed account");
    }
    for (value, name) in [("cn=admins", "admins"), ("cn=staff", "staff")] {
        store
            .insert_entitlement(RawEntitlement {
                value: json!(value),
                name: json!(name),
                attributes: AttributeBag::new(),
            })
            .await;
    }
    store
}

/// `Retry-After` header sent with the simulated 429 responses; already past.
pub const PAST_RETRY_AFTER: &str = "Wed, 21 Oct 2015 07:28:00 GMT";

/// Store failing with a transient error for the first `failures` calls.
///
/// Each failure carries the hint parsed from [`PAST_RETRY_AFTER`], as a
/// transport store would build it from a rate-limited response.
#[derive(Clone)]
pub struct FlakyStore {
    inner: InMemoryRecordStore,
    remaining: Arc<AtomicU32>,
    pub calls: Arc<AtomicU32>,
}

impl FlakyStore {
    pub fn new(inner: InMemoryRecordStore, failures: u32) -> Self {
        Self {
            inner,
            remaining: Arc::new(AtomicU32::new(failures)),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    fn check(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.remaining.store(remaining - 1, Ordering::SeqCst);
            let hint = parse_retry_after(PAST_RETRY_AFTER, Utc::now());
            return Err(StoreError::rate_limited(hint));
        }
        Ok(())
    }
}

impl RecordStore for FlakyStore {
    async fn list_accounts(&self) -> StoreResult<Vec<RawRecord>> {
        self.check()?;
        self.inner.list_accounts().await
    }

    async fn fetch_account(&self, identity: &str) -> StoreResult<Option<RawRecord>> {
        self.check()?;
        self.inner.fetch_account(identity).await
    }

    async fn write_account(&self, identity: &str, attributes: AttributeBag) -> StoreResult<RawRecord> {
        self.check()?;
        self.inner.write_account(identity, attributes).await
    }

    async fn create_account(&self, attributes: AttributeBag) -> StoreResult<RawRecord> {
        self.check()?;
        self.inner.create_account(attributes).await
    }

    async fn set_disabled(
        &self,
        identity: &str,
        status_attribute: &str,
        disabled: bool,
    ) -> StoreResult<RawRecord> {
        self.check()?;
        self.inner.set_disabled(identity, status_attribute, disabled).await
    }

    async fn list_entitlements(&self) -> StoreResult<Vec<RawEntitlement>> {
        self.check()?;
        self.inner.list_entitlements().await
    }
}
