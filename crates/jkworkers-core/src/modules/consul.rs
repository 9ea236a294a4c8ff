//! Consul agent service catalog.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;

use super::collaborators::ServiceRegistry;
use super::http::{base_url, build_http_client};
use crate::error::AppResult;
use jkworkers_types::{RegistryError, ServiceEntry, Snapshot};

const AGENT_SERVICES_PATH: &str = "v1/agent/services";

/// One value of the `/v1/agent/services` response object.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AgentService {
    #[serde(rename = "ID")]
    id: String,
    service: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    address: String,
    #[serde(default)]
    port: u16,
}

impl From<AgentService> for ServiceEntry {
    fn from(s: AgentService) -> Self {
        Self {
            name: s.service,
            id: s.id,
            address: s.address,
            port: s.port,
            tags: s.tags.unwrap_or_default().into_iter().collect(),
        }
    }
}

/// Reads the services registered with one Consul agent.
pub struct ConsulRegistry {
    client: reqwest::Client,
    services_url: Url,
    address: String,
}

impl ConsulRegistry {
    pub fn new(address: &str) -> AppResult<Self> {
        Self::with_client(address, build_http_client(None)?)
    }

    pub fn with_client(address: &str, client: reqwest::Client) -> AppResult<Self> {
        let services_url = base_url(address, false)?.join(AGENT_SERVICES_PATH)?;
        Ok(Self { client, services_url, address: address.to_string() })
    }
}

#[async_trait]
impl ServiceRegistry for ConsulRegistry {
    /// The snapshot is ordered by service id.
    async fn list_services(&self) -> Result<Snapshot, RegistryError> {
        tracing::debug!("Querying Consul agent services at {}", self.services_url);

        let resp = self.client.get(self.services_url.clone()).send().await.map_err(|e| {
            RegistryError::Unreachable { address: self.address.clone(), message: e.to_string() }
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| RegistryError::Unreachable {
            address: self.address.clone(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(RegistryError::BadStatus { status: status.as_u16(), message: body });
        }

        let services: BTreeMap<String, AgentService> = serde_json::from_str(&body)
            .map_err(|e| RegistryError::Decode { message: e.to_string() })?;

        tracing::debug!("Consul returned {} services", services.len());
        Ok(services.into_values().map(ServiceEntry::from).collect())
    }
}
