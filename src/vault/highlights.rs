//! Highlighted vaults per asset (largest TVL, best net yields).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::{AssetGroup, VaultRecord};

/// How many top-yield vaults are surfaced per asset.
pub const HIGH_APY_SLOTS: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultHighlights {
    pub high_tvl: Option<VaultRecord>,
    pub high_apy: Vec<VaultRecord>,
}

impl VaultHighlights {
    pub fn for_group(group: &AssetGroup) -> Self {
        Self {
            high_tvl: highest_tvl(&group.vaults).cloned(),
            high_apy: highest_net_apy(&group.vaults, HIGH_APY_SLOTS)
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}

/// Vault with the largest USD TVL. Earlier vaults win ties; vaults without a
/// finite TVL are skipped.
pub fn highest_tvl(vaults: &[VaultRecord]) -> Option<&VaultRecord> {
    let mut best: Option<(&VaultRecord, f64)> = None;
    for vault in vaults {
        let Some(tvl) = vault.state.total_assets_usd.filter(|v| v.is_finite()) else {
            continue;
        };
        match best {
            Some((_, top)) if tvl <= top => {}
            _ => best = Some((vault, tvl)),
        }
    }
    best.map(|(vault, _)| vault)
}

/// Up to `n` vaults ordered by net APY, descending. The sort is stable so
/// equal yields keep encounter order.
pub fn highest_net_apy(vaults: &[VaultRecord], n: usize) -> Vec<&VaultRecord> {
    let mut ranked: Vec<(&VaultRecord, f64)> = vaults
        .iter()
        .filter_map(|v| {
            v.state
                .net_apy
                .filter(|apy| apy.is_finite())
                .map(|apy| (v, apy))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked.into_iter().take(n).map(|(v, _)| v).collect()
}
