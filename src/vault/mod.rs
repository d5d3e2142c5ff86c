//! Vault Module - Asset Grouping & Publication
//!
//! This module handles:
//! 1. Grouping vault snapshots by underlying asset (eligible vaults only)
//! 2. Picking highlighted vaults per asset
//! 3. Publishing the latest grouping per chain for readers
//!
//! Architecture:
//! - A `VaultSource` delivers the raw vault list for one chain
//! - `aggregate` turns it into `AssetGroup`s
//! - `AssetBoard` swaps the result in atomically on every refresh

pub mod aggregator;
pub mod board;
pub mod highlights;

pub use aggregator::{aggregate, aggregate_owned};
pub use board::{spawn_refresh_loop, AssetBoard, BoardSnapshot, RefreshOutcome, VaultSource};
pub use highlights::{highest_net_apy, highest_tvl, VaultHighlights, HIGH_APY_SLOTS};
