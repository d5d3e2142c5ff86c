//! Integration tests for grouping a recorded Morpho snapshot
//!
//! Uses `tests/fixtures/morpho_vaults.json`, a trimmed GetAssets response with
//! one malformed item, a null state, a zero-yield vault and an unlisted vault.

use std::path::PathBuf;

use vaultboard_backend::{
    scrapers::load_snapshot_file,
    vault::{aggregate, AssetBoard, VaultHighlights},
};

const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("morpho_vaults.json")
}

#[test]
fn test_fixture_decodes_all_but_malformed() {
    let records = load_snapshot_file(&fixture_path()).expect("fixture should load");

    assert_eq!(records.len(), 6);
    assert!(records.iter().all(|r| r.address != "0x0000000000000000000000000000000000000bad"));
}

#[test]
fn test_fixture_grouping() {
    let records = load_snapshot_file(&fixture_path()).unwrap();
    let groups = aggregate(&records);

    let assets: Vec<&str> = groups.iter().map(|g| g.address.as_str()).collect();
    assert_eq!(assets, vec![USDC, WETH]);

    let usdc: Vec<&str> = groups[0].vaults.iter().map(|v| v.symbol.as_str()).collect();
    assert_eq!(usdc, vec!["steakUSDC", "USUALUSDC+"]);
    assert_eq!(groups[0].decimals, 6);
    assert_eq!(
        groups[0].logo_uri.as_deref(),
        Some("https://cdn.morpho.org/assets/logos/usdc.svg")
    );

    let weth: Vec<&str> = groups[1].vaults.iter().map(|v| v.symbol.as_str()).collect();
    assert_eq!(weth, vec!["bbETH"]);
    assert_eq!(groups[1].vaults[0].state.net_apy, Some(0.0279));
}

#[test]
fn test_fixture_highlights() {
    let records = load_snapshot_file(&fixture_path()).unwrap();
    let groups = aggregate(&records);
    let highlights = VaultHighlights::for_group(&groups[0]);

    assert_eq!(
        highlights.high_tvl.map(|v| v.symbol),
        Some("steakUSDC".to_string())
    );
    let apy: Vec<String> = highlights.high_apy.into_iter().map(|v| v.symbol).collect();
    assert_eq!(apy, vec!["USUALUSDC+", "steakUSDC"]);
}

#[test]
fn test_board_serves_fixture_snapshot() {
    let records = load_snapshot_file(&fixture_path()).unwrap();
    let board = AssetBoard::new();
    board.publish(1, records);

    let snapshot = board.snapshot(1).unwrap();
    assert_eq!(snapshot.record_count, 6);
    assert!(snapshot.group(&WETH.to_lowercase()).is_some());
    assert!(snapshot.group("0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599").is_none());
}
