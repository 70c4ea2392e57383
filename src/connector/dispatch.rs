//! Transport-agnostic command dispatch.
//!
//! The platform invokes a connector with a command type and an input
//! document. [`ConnectorCommand`] models those commands and
//! [`Connector::handle_command`] routes them to the lifecycle operations,
//! turning every outcome into a [`CommandResponse`]. A failed command always
//! yields an error response, never an empty or partial success.

use super::core::Connector;
use crate::account::{AttributeBag, AttributeChange};
use crate::error::{ConnectorError, ConnectorResult};
use crate::schema::SchemaRepository;
use crate::storage::RecordStore;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A lifecycle command with its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "input")]
pub enum ConnectorCommand {
    #[serde(rename = "std:test-connection")]
    TestConnection(Option<CommandOptions>),
    #[serde(rename = "std:account:list")]
    AccountList(Option<CommandOptions>),
    #[serde(rename = "std:account:read")]
    AccountRead { identity: String },
    #[serde(rename = "std:account:create")]
    AccountCreate {
        #[serde(default)]
        identity: Option<String>,
        #[serde(default)]
        key: Option<AccountKeyInput>,
        #[serde(default)]
        attributes: AttributeBag,
    },
    #[serde(rename = "std:account:update")]
    AccountUpdate {
        identity: String,
        #[serde(default)]
        changes: Vec<AttributeChange>,
    },
    #[serde(rename = "std:account:enable")]
    AccountEnable { identity: String },
    #[serde(rename = "std:account:disable")]
    AccountDisable { identity: String },
    #[serde(rename = "std:entitlement:list")]
    EntitlementList {
        #[serde(rename = "type")]
        entitlement_type: String,
    },
    #[serde(rename = "std:account:discover-schema")]
    AccountDiscoverSchema(Option<CommandOptions>),
}

impl ConnectorCommand {
    /// Platform name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            ConnectorCommand::TestConnection(_) => "std:test-connection",
            ConnectorCommand::AccountList(_) => "std:account:list",
            ConnectorCommand::AccountRead { .. } => "std:account:read",
            ConnectorCommand::AccountCreate { .. } => "std:account:create",
            ConnectorCommand::AccountUpdate { .. } => "std:account:update",
            ConnectorCommand::AccountEnable { .. } => "std:account:enable",
            ConnectorCommand::AccountDisable { .. } => "std:account:disable",
            ConnectorCommand::EntitlementList { .. } => "std:entitlement:list",
            ConnectorCommand::AccountDiscoverSchema(_) => "std:account:discover-schema",
        }
    }
}

/// Input of commands without arguments of their own.
///
/// The platform sends an input object with every command, possibly `null`
/// or absent. The attached schema is accepted but the connector always
/// resolves the account schema through its own repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

/// Explicit account key supplied with a create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountKeyInput {
    #[serde(default)]
    pub simple: Option<SimpleKeyInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleKeyInput {
    #[serde(default)]
    pub id: Option<Value>,
}

/// Structured response to a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    /// Objects sent back to the platform, one per emitted item
    #[serde(default)]
    pub data: Vec<Value>,
    /// Human-readable diagnostics (e.g. skipped changes)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CommandResponse {
    fn ok(data: Vec<Value>) -> Self {
        Self {
            success: true,
            data,
            warnings: Vec::new(),
            error: None,
            error_code: None,
        }
    }

    fn from_error(error: &ConnectorError) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            warnings: Vec::new(),
            error: Some(error.to_string()),
            error_code: Some(error.error_code().to_string()),
        }
    }
}

impl<R: SchemaRepository, S: RecordStore> Connector<R, S> {
    /// Route a command to its operation.
    pub async fn handle_command(&self, command: ConnectorCommand) -> CommandResponse {
        let name = command.name();
        info!("Connector processing {}", name);

        match self.dispatch(command).await {
            Ok(response) => {
                debug!("{} completed with {} items", name, response.data.len());
                response
            }
            Err(e) => {
                warn!("{} failed: {}", name, e);
                CommandResponse::from_error(&e)
            }
        }
    }

    async fn dispatch(&self, command: ConnectorCommand) -> ConnectorResult<CommandResponse> {
        let response = match command {
            ConnectorCommand::TestConnection(_) => {
                CommandResponse::ok(vec![serde_json::to_value(self.test_connection().await?)?])
            }
            ConnectorCommand::AccountList(_) => {
                let accounts = self.account_list().await?;
                let data = accounts
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<Result<Vec<_>, _>>()?;
                CommandResponse::ok(data)
            }
            ConnectorCommand::AccountRead { identity } => {
                CommandResponse::ok(vec![serde_json::to_value(self.account_read(&identity).await?)?])
            }
            ConnectorCommand::AccountCreate {
                identity,
                key,
                attributes,
            } => {
                let key = key.and_then(|k| k.simple).and_then(|s| s.id);
                let output = self
                    .account_create(identity.as_deref(), key, &attributes)
                    .await?;
                CommandResponse::ok(vec![serde_json::to_value(output)?])
            }
            ConnectorCommand::AccountUpdate { identity, changes } => {
                let output = self.account_update(&identity, &changes).await?;
                let mut response = CommandResponse::ok(vec![serde_json::to_value(&output.account)?]);
                response.warnings = output.diagnostics.iter().map(|d| d.to_string()).collect();
                response
            }
            ConnectorCommand::AccountEnable { identity } => {
                CommandResponse::ok(vec![serde_json::to_value(self.account_enable(&identity).await?)?])
            }
            ConnectorCommand::AccountDisable { identity } => {
                CommandResponse::ok(vec![serde_json::to_value(self.account_disable(&identity).await?)?])
            }
            ConnectorCommand::EntitlementList { entitlement_type } => {
                let entitlements = self.entitlement_list(&entitlement_type).await?;
                let data = entitlements
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<Result<Vec<_>, _>>()?;
                CommandResponse::ok(data)
            }
            ConnectorCommand::AccountDiscoverSchema(_) => {
                CommandResponse::ok(vec![serde_json::to_value(self.discover_schema().await?)?])
            }
        };
        Ok(response)
    }
}
