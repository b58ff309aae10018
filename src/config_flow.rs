use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::api::Connector;
use crate::config::ConfigEntry;
use crate::{Error, Result};

pub const ERROR_CANNOT_CONNECT: &str = "cannot_connect";
pub const ERROR_NO_UNITS: &str = "no_units";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub host: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowResult {
    /// Ask for (or re-ask for) the host. Keys are field names, `"base"` for the form.
    ShowForm { errors: BTreeMap<String, String> },
    CreateEntry(ConfigEntry),
}

/// Interactive setup of a new console.
pub struct ConfigFlow {
    connector: Arc<dyn Connector>,
}

impl ConfigFlow {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    pub async fn step_user(&self, input: Option<UserInput>) -> Result<FlowResult> {
        let Some(input) = input else {
            return Ok(FlowResult::ShowForm {
                errors: BTreeMap::new(),
            });
        };

        let mut errors = BTreeMap::new();
        match self.validate_connection(&input.host).await {
            Ok(()) => return Ok(FlowResult::CreateEntry(ConfigEntry::new(input.host))),
            Err(Error::NoUnits) => {
                errors.insert("base".to_string(), ERROR_NO_UNITS.to_string());
            }
            Err(e) if e.is_connectivity() => {
                debug!(host = %input.host, error = %e, "cannot connect");
                errors.insert("base".to_string(), ERROR_CANNOT_CONNECT.to_string());
            }
            Err(e) => return Err(e),
        }
        Ok(FlowResult::ShowForm { errors })
    }

    /// The console must answer and report at least one group.
    pub async fn validate_connection(&self, host: &str) -> Result<()> {
        let client = self.connector.connect(host).await?;
        client.refresh_state().await?;
        if client.groups().is_empty() {
            return Err(Error::NoUnits);
        }
        Ok(())
    }
}
