//! Asset Board - latest grouped snapshot per chain
//!
//! Each refresh aggregates a fresh vault snapshot and swaps it in as a whole.
//! Readers hold an `Arc<BoardSnapshot>` and never see a half-built result.
//! When the data source is unavailable the previous snapshot stays published.

use anyhow::Result;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::models::{AssetGroup, VaultRecord};
use crate::vault::aggregator::aggregate_owned;

/// Anything that can list the vaults of one chain.
#[async_trait::async_trait]
pub trait VaultSource: Send + Sync {
    async fn fetch_vaults(&self, chain_id: u64) -> Result<Vec<VaultRecord>>;
}

/// Immutable aggregation result for one chain.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub chain_id: u64,
    pub record_count: usize,
    pub refreshed_at: DateTime<Utc>,
    pub groups: Vec<AssetGroup>,
}

impl BoardSnapshot {
    /// Case-insensitive lookup; EVM addresses arrive in mixed checksum case.
    pub fn group(&self, asset_address: &str) -> Option<&AssetGroup> {
        self.groups
            .iter()
            .find(|g| g.address.eq_ignore_ascii_case(asset_address))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Published { groups: usize, records: usize },
    /// Fetch failed; whatever was published before is still served.
    KeptPrevious,
}

pub struct AssetBoard {
    snapshots: ArcSwap<HashMap<u64, Arc<BoardSnapshot>>>,
}

impl Default for AssetBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetBoard {
    pub fn new() -> Self {
        Self {
            snapshots: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// `None` until the first successful refresh for `chain_id`.
    pub fn snapshot(&self, chain_id: u64) -> Option<Arc<BoardSnapshot>> {
        self.snapshots.load().get(&chain_id).cloned()
    }

    pub fn chains(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.snapshots.load().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Aggregate `records` and replace the chain's snapshot.
    pub fn publish(&self, chain_id: u64, records: Vec<VaultRecord>) -> Arc<BoardSnapshot> {
        let record_count = records.len();
        let snapshot = Arc::new(BoardSnapshot {
            chain_id,
            record_count,
            refreshed_at: Utc::now(),
            groups: aggregate_owned(records),
        });

        self.snapshots.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.insert(chain_id, snapshot.clone());
            next
        });

        snapshot
    }

    /// Fetch and publish one chain. Fetch errors are logged, not returned.
    pub async fn refresh(&self, source: &dyn VaultSource, chain_id: u64) -> RefreshOutcome {
        match source.fetch_vaults(chain_id).await {
            Ok(records) => {
                let snapshot = self.publish(chain_id, records);
                info!(
                    chain_id,
                    records = snapshot.record_count,
                    groups = snapshot.groups.len(),
                    "📊 vault board refreshed"
                );
                RefreshOutcome::Published {
                    groups: snapshot.groups.len(),
                    records: snapshot.record_count,
                }
            }
            Err(e) => {
                warn!(
                    chain_id,
                    error = %format!("{e:#}"),
                    has_previous = self.snapshot(chain_id).is_some(),
                    "⚠️ vault source unavailable, keeping previous snapshot"
                );
                RefreshOutcome::KeptPrevious
            }
        }
    }
}

/// Refresh every chain on a fixed interval. The first tick fires immediately.
pub fn spawn_refresh_loop(
    board: Arc<AssetBoard>,
    source: Arc<dyn VaultSource>,
    chain_ids: Vec<u64>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            for &chain_id in &chain_ids {
                board.refresh(source.as_ref(), chain_id).await;
            }
        }
    })
}
