//! In-memory record store.
//!
//! Thread-safe implementation of [`RecordStore`] backed by a `BTreeMap` behind
//! a tokio `RwLock`. Intended for tests, local development and demos of the
//! connector without a live source.
//!
//! Accounts are keyed by native identity, read from the configured identity
//! attribute when an account is created. Each record also receives a
//! generated source id, which projection exposes as `accountID`.

use super::{RecordStore, StoreError, StoreResult};
use crate::account::{AttributeBag, RawEntitlement, RawRecord};
use log::{debug, trace};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct StoreData {
    // native identity -> record
    accounts: BTreeMap<String, RawRecord>,
    entitlements: Vec<RawEntitlement>,
}

/// Thread-safe in-memory record store.
#[derive(Debug, Clone)]
pub struct InMemoryRecordStore {
    identity_attribute: String,
    data: Arc<RwLock<StoreData>>,
}

impl InMemoryRecordStore {
    /// Create an empty store keying accounts by `identity_attribute`.
    pub fn new(identity_attribute: impl Into<String>) -> Self {
        Self {
            identity_attribute: identity_attribute.into(),
            data: Arc::new(RwLock::new(StoreData::default())),
        }
    }

    /// Insert a record as-is, keyed by the given native identity.
    pub async fn insert_record(&self, identity: impl Into<String>, record: RawRecord) {
        let mut guard = self.data.write().await;
        guard.accounts.insert(identity.into(), record);
    }

    /// Add an entitlement to the catalog.
    pub async fn insert_entitlement(&self, entitlement: RawEntitlement) {
        let mut guard = self.data.write().await;
        guard.entitlements.push(entitlement);
    }

    /// Get store statistics for debugging and tests.
    pub async fn stats(&self) -> InMemoryStoreStats {
        let guard = self.data.read().await;
        InMemoryStoreStats {
            account_count: guard.accounts.len(),
            entitlement_count: guard.entitlements.len(),
        }
    }

    /// Remove all accounts and entitlements.
    pub async fn clear(&self) {
        let mut guard = self.data.write().await;
        guard.accounts.clear();
        guard.entitlements.clear();
    }

    fn native_identity(&self, attributes: &AttributeBag) -> StoreResult<String> {
        match attributes.get(&self.identity_attribute) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(StoreError::rejected(format!(
                "account is missing identity attribute '{}'",
                self.identity_attribute
            ))),
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    async fn list_accounts(&self) -> StoreResult<Vec<RawRecord>> {
        let guard = self.data.read().await;
        Ok(guard.accounts.values().cloned().collect())
    }

    async fn fetch_account(&self, identity: &str) -> StoreResult<Option<RawRecord>> {
        let guard = self.data.read().await;
        trace!("Fetching account '{}'", identity);
        Ok(guard.accounts.get(identity).cloned())
    }

    async fn write_account(&self, identity: &str, attributes: AttributeBag) -> StoreResult<RawRecord> {
        let mut guard = self.data.write().await;
        let record = guard
            .accounts
            .get_mut(identity)
            .ok_or_else(|| StoreError::not_found(identity))?;

        record.attributes = attributes;
        debug!("Wrote account '{}' ({})", identity, record.id);
        Ok(record.clone())
    }

    async fn create_account(&self, attributes: AttributeBag) -> StoreResult<RawRecord> {
        let identity = self.native_identity(&attributes)?;
        let mut guard = self.data.write().await;

        if guard.accounts.contains_key(&identity) {
            return Err(StoreError::rejected(format!(
                "account '{}' already exists",
                identity
            )));
        }

        let record = RawRecord::new(uuid::Uuid::new_v4().to_string(), attributes);
        debug!("Created account '{}' ({})", identity, record.id);
        guard.accounts.insert(identity, record.clone());
        Ok(record)
    }

    async fn set_disabled(
        &self,
        identity: &str,
        status_attribute: &str,
        disabled: bool,
    ) -> StoreResult<RawRecord> {
        let mut guard = self.data.write().await;
        let record = guard
            .accounts
            .get_mut(identity)
            .ok_or_else(|| StoreError::not_found(identity))?;

        record
            .attributes
            .insert(status_attribute.to_string(), Value::Bool(disabled));
        Ok(record.clone())
    }

    async fn list_entitlements(&self) -> StoreResult<Vec<RawEntitlement>> {
        let guard = self.data.read().await;
        Ok(guard.entitlements.clone())
    }
}

/// Statistics about the current state of the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryStoreStats {
    pub account_count: usize,
    pub entitlement_count: usize,
}
