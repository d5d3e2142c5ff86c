//! Morpho GraphQL API Client
//!
//! Fetches the vault list for a single chain. One request per refresh, no
//! retries: a failed fetch leaves the previously published board in place.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::VaultRecord;
use crate::vault::board::VaultSource;

pub const MORPHO_API_URL: &str = "https://blue-api.morpho.org/graphql";

pub const GET_ASSETS_QUERY: &str = r#"
  query GetAssets($chainId: [Int!]) {
    vaults(where: { chainId_in: $chainId }) {
      items {
        address
        symbol
        name
        creationBlockNumber
        creationTimestamp
        creatorAddress
        whitelisted
        asset {
          address
          logoURI
          name
          symbol
          decimals
        }
        state {
          id
          apy
          netApy
          totalAssets
          totalAssetsUsd
          fee
          timelock
        }
      }
    }
  }
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<VaultsData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct VaultsData {
    vaults: Option<VaultItems>,
}

#[derive(Debug, Deserialize)]
struct VaultItems {
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Clone)]
pub struct MorphoClient {
    client: Client,
    endpoint: String,
}

impl MorphoClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Vaultboard/1.0")
            .build()
            .context("Failed to build MorphoClient")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch every vault listed on `chain_id`.
    pub async fn fetch_vaults(&self, chain_id: u64) -> Result<Vec<VaultRecord>> {
        let body = json!({
            "query": GET_ASSETS_QUERY,
            "variables": { "chainId": [chain_id] },
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("POST GetAssets failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("POST GetAssets {}: {}", status, text));
        }

        let text = resp.text().await.context("GetAssets response text")?;
        debug!(chain_id, body_len = text.len(), "morpho API response received");

        parse_vaults_response(&text)
            .with_context(|| format!("GetAssets response for chain {}", chain_id))
    }
}

#[async_trait::async_trait]
impl VaultSource for MorphoClient {
    async fn fetch_vaults(&self, chain_id: u64) -> Result<Vec<VaultRecord>> {
        MorphoClient::fetch_vaults(self, chain_id).await
    }
}

/// Decode a GraphQL response body into vault records.
///
/// GraphQL errors and a missing `data.vaults` node are treated as the source
/// being unavailable. Individual undecodable items are dropped.
pub fn parse_vaults_response(body: &str) -> Result<Vec<VaultRecord>> {
    let resp: GraphQlResponse = serde_json::from_str(body)
        .map_err(|e| {
            warn!(error = %e, body_preview = %body.chars().take(500).collect::<String>(), "GetAssets JSON parse failed");
            e
        })
        .context("GetAssets json parse")?;

    if !resp.errors.is_empty() {
        let messages: Vec<&str> = resp.errors.iter().map(|e| e.message.as_str()).collect();
        bail!("GraphQL errors: {}", messages.join("; "));
    }

    let Some(vaults) = resp.data.and_then(|d| d.vaults) else {
        bail!("GetAssets response has no data.vaults");
    };

    Ok(decode_vault_items(vaults.items))
}

/// Decode items one at a time so a single ungroupable vault (missing or
/// non-string asset address) does not sink the whole snapshot. Unreadable
/// scalar fields decode to `None` and only affect that vault's eligibility.
pub fn decode_vault_items(items: Vec<Value>) -> Vec<VaultRecord> {
    let total = items.len();
    let mut records = Vec::with_capacity(total);

    for (index, item) in items.into_iter().enumerate() {
        let address = item
            .get("address")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();
        match serde_json::from_value::<VaultRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => warn!(index, vault = %address, error = %e, "skipping malformed vault record"),
        }
    }

    if records.len() < total {
        warn!(
            decoded = records.len(),
            skipped = total - records.len(),
            "vault snapshot contained malformed records"
        );
    }

    records
}

/// Load a saved snapshot: either a full GraphQL response or a bare array of
/// vault items.
pub fn load_snapshot_file(path: &Path) -> Result<Vec<VaultRecord>> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {:?}", path))?;

    if body.trim_start().starts_with('[') {
        let items: Vec<Value> =
            serde_json::from_str(&body).context("snapshot array json parse")?;
        return Ok(decode_vault_items(items));
    }

    parse_vaults_response(&body)
}
