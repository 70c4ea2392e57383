//! Record store abstraction.
//!
//! The [`RecordStore`] trait is the connector's view of the remote system that
//! holds account and entitlement records. It speaks in raw records and
//! attribute bags only; projection and change application happen in
//! [`crate::account`], never in a store.
//!
//! # Example Usage
//!
//! ```rust
//! use iga_connector::storage::{InMemoryRecordStore, RecordStore};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryRecordStore::new("id");
//! let attributes = json!({"id": "jdoe", "groups": ["admins"]}).as_object().cloned().unwrap();
//!
//! let created = store.create_account(attributes).await?;
//! let fetched = store.fetch_account("jdoe").await?;
//! assert_eq!(fetched.map(|r| r.id), Some(created.id));
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod in_memory;
pub mod retry;

pub use errors::{StoreError, StoreResult};
pub use in_memory::{InMemoryRecordStore, InMemoryStoreStats};
pub use retry::{RetryPolicy, RetryingRecordStore, parse_retry_after};

use crate::account::{AttributeBag, RawEntitlement, RawRecord};
use std::future::Future;

/// Remote system holding account and entitlement records.
///
/// Accounts are addressed by their native identity (the value of the
/// schema's identity attribute on the source).
pub trait RecordStore: Send + Sync {
    /// List every account of the source.
    fn list_accounts(&self) -> impl Future<Output = StoreResult<Vec<RawRecord>>> + Send;

    /// Fetch one account; `None` when no record has this identity.
    fn fetch_account(
        &self,
        identity: &str,
    ) -> impl Future<Output = StoreResult<Option<RawRecord>>> + Send;

    /// Replace the attributes of an existing account and return the stored record.
    fn write_account(
        &self,
        identity: &str,
        attributes: AttributeBag,
    ) -> impl Future<Output = StoreResult<RawRecord>> + Send;

    /// Create an account from its attributes and return the stored record.
    fn create_account(
        &self,
        attributes: AttributeBag,
    ) -> impl Future<Output = StoreResult<RawRecord>> + Send;

    /// Set the account's status attribute to `disabled`.
    fn set_disabled(
        &self,
        identity: &str,
        status_attribute: &str,
        disabled: bool,
    ) -> impl Future<Output = StoreResult<RawRecord>> + Send;

    /// List every entitlement of the source.
    fn list_entitlements(&self) -> impl Future<Output = StoreResult<Vec<RawEntitlement>>> + Send;
}
