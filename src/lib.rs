//! Vaultboard Backend Library
//!
//! Groups on-chain vault snapshots by underlying asset and serves the
//! eligible vaults per asset to the frontend.

pub mod api;
pub mod config;
pub mod models;
pub mod scrapers;
pub mod vault;
