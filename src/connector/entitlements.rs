//! Entitlement listing.

use super::core::Connector;
use crate::account::Entitlement;
use crate::error::ConnectorResult;
use crate::schema::SchemaRepository;
use crate::storage::RecordStore;
use log::info;

impl<R: SchemaRepository, S: RecordStore> Connector<R, S> {
    /// List the source's entitlements, tagged with the requested type.
    pub async fn entitlement_list(&self, entitlement_type: &str) -> ConnectorResult<Vec<Entitlement>> {
        let entitlements: Vec<Entitlement> = self
            .store
            .list_entitlements()
            .await?
            .into_iter()
            .map(|raw| raw.into_entitlement(entitlement_type))
            .collect();

        info!("stdEntitlementList sent {} entitlements", entitlements.len());
        Ok(entitlements)
    }
}
