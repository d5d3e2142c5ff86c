//! Vault Aggregator
//!
//! Groups a flat vault snapshot by underlying asset, keeping only vaults that
//! are whitelisted and earn a positive net APY. Runs in two phases: every
//! record seeds its asset's group, then groups left without eligible vaults
//! are pruned. Output order follows first sighting of each asset.

use indexmap::IndexMap;
use tracing::debug;

use crate::models::{AssetGroup, VaultRecord};

/// Group `records` by asset address, cloning eligible records into the output.
pub fn aggregate(records: &[VaultRecord]) -> Vec<AssetGroup> {
    aggregate_iter(records.iter().cloned())
}

/// Same as [`aggregate`] but takes ownership of the snapshot, avoiding clones.
pub fn aggregate_owned(records: Vec<VaultRecord>) -> Vec<AssetGroup> {
    aggregate_iter(records)
}

fn aggregate_iter<I>(records: I) -> Vec<AssetGroup>
where
    I: IntoIterator<Item = VaultRecord>,
{
    let mut groups: IndexMap<String, AssetGroup> = IndexMap::new();
    let mut record_count = 0usize;

    for record in records {
        record_count += 1;

        let group = groups
            .entry(record.asset.address.clone())
            .or_insert_with(|| AssetGroup::seeded(&record.asset));

        if record.is_eligible() {
            group.vaults.push(record);
        }
    }

    let assets_seen = groups.len();
    let out: Vec<AssetGroup> = groups
        .into_values()
        .filter(|group| !group.vaults.is_empty())
        .collect();

    debug!(
        records = record_count,
        assets_seen,
        groups = out.len(),
        eligible_vaults = out.iter().map(|g| g.vaults.len()).sum::<usize>(),
        "aggregated vault snapshot"
    );

    out
}
