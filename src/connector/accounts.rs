//! Account lifecycle operations.

use super::core::Connector;
use crate::account::{
    AccountCreateOutput, AttributeBag, AttributeChange, ChangeDiagnostic, IdentityHints,
    NormalizedAccount, RawRecord, apply_changes, materialize, prepare_create, project,
};
use crate::error::{ConnectorError, ConnectorResult, StatusAction};
use crate::schema::{Schema, SchemaRepository};
use crate::storage::{RecordStore, StoreError};
use log::{info, warn};
use serde_json::Value;

/// Result of an account update.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountUpdateOutput {
    pub account: NormalizedAccount,
    /// Changes that were skipped while applying the batch
    pub diagnostics: Vec<ChangeDiagnostic>,
}

impl<R: SchemaRepository, S: RecordStore> Connector<R, S> {
    /// List every account of the source, normalized against the schema.
    pub async fn account_list(&self) -> ConnectorResult<Vec<NormalizedAccount>> {
        let schema = self.schema().await?;
        let records = self.store.list_accounts().await?;

        let accounts: Vec<NormalizedAccount> = records
            .iter()
            .map(|record| normalize(record, &schema, &IdentityHints::none()))
            .collect();

        info!("stdAccountList sent {} accounts", accounts.len());
        Ok(accounts)
    }

    /// Read one account by native identity.
    pub async fn account_read(&self, identity: &str) -> ConnectorResult<NormalizedAccount> {
        let schema = self.schema().await?;
        let record = self.fetch(identity).await?;
        let account = normalize(&record, &schema, &IdentityHints::none().with_fallback(identity));

        info!("stdAccountRead read account : {}", identity);
        Ok(account)
    }

    /// Create an account from the requested attributes.
    ///
    /// `identity` is the identity the platform targeted and `key` an explicit
    /// key from the request, if it carried one.
    pub async fn account_create(
        &self,
        identity: Option<&str>,
        key: Option<Value>,
        attributes: &AttributeBag,
    ) -> ConnectorResult<AccountCreateOutput> {
        let schema = self.schema().await?;

        let mut hints = IdentityHints::none();
        hints.explicit_key = key;
        hints.fallback = identity.map(|id| Value::String(id.to_string()));

        let plan = prepare_create(attributes, &schema, &hints);
        let created = self.store.create_account(plan.payload).await?;

        info!(
            "Account created successfully on target system: {}",
            serde_json::to_string(&created)?
        );
        Ok(plan.output)
    }

    /// Apply a change batch to an account and write the result back.
    ///
    /// Skipped changes are reported in the output; a failed write is an
    /// error and nothing is reported as applied.
    pub async fn account_update(
        &self,
        identity: &str,
        changes: &[AttributeChange],
    ) -> ConnectorResult<AccountUpdateOutput> {
        let schema = self.schema().await?;
        let record = self.fetch(identity).await?;

        let outcome = apply_changes(&record.attributes, changes, &schema);

        self.store
            .write_account(identity, outcome.attributes.clone())
            .await
            .map_err(|source| ConnectorError::RemoteWriteFailure {
                identity: identity.to_string(),
                source,
            })?;

        let previous = normalize(&record, &schema, &IdentityHints::none().with_fallback(identity));
        let updated = RawRecord::new(record.id.clone(), outcome.attributes);
        let account = NormalizedAccount {
            identity_value: previous.identity_value,
            display_value: previous.display_value,
            attributes: project(&updated, &schema),
        };

        if !outcome.diagnostics.is_empty() {
            warn!(
                "Account '{}' updated with {} skipped changes",
                identity,
                outcome.diagnostics.len()
            );
        }
        info!(
            "Account updated successfully on target system: {}",
            serde_json::to_string(&account)?
        );

        Ok(AccountUpdateOutput {
            account,
            diagnostics: outcome.diagnostics,
        })
    }

    /// Enable an account by clearing its status attribute.
    pub async fn account_enable(&self, identity: &str) -> ConnectorResult<NormalizedAccount> {
        self.toggle_status(identity, StatusAction::Enable).await
    }

    /// Disable an account by setting its status attribute.
    pub async fn account_disable(&self, identity: &str) -> ConnectorResult<NormalizedAccount> {
        self.toggle_status(identity, StatusAction::Disable).await
    }

    async fn toggle_status(
        &self,
        identity: &str,
        action: StatusAction,
    ) -> ConnectorResult<NormalizedAccount> {
        let schema = self.schema().await?;
        let disabled = action == StatusAction::Disable;

        let record = self
            .store
            .set_disabled(identity, &self.status_attribute, disabled)
            .await
            .map_err(|source| match source {
                StoreError::NotFound { .. } => ConnectorError::record_not_found(identity),
                source => ConnectorError::StatusToggle {
                    identity: identity.to_string(),
                    action,
                    status_attribute: self.status_attribute.clone(),
                    source,
                },
            })?;

        let account = normalize(&record, &schema, &IdentityHints::none().with_fallback(identity));
        info!(
            "Account {}d successfully on target system: {}",
            action,
            serde_json::to_string(&account)?
        );
        Ok(account)
    }

    async fn fetch(&self, identity: &str) -> ConnectorResult<RawRecord> {
        match self.store.fetch_account(identity).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) | Err(StoreError::NotFound { .. }) => {
                Err(ConnectorError::record_not_found(identity))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn normalize(record: &RawRecord, schema: &Schema, hints: &IdentityHints) -> NormalizedAccount {
    materialize(project(record, schema), schema, hints)
}
