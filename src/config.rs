//! Environment-driven configuration.

use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use std::path::Path;
use std::time::Duration;

use crate::scrapers::morpho_api::MORPHO_API_URL;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub morpho_api_url: String,
    pub chain_ids: Vec<u64>,
    pub refresh_interval: Duration,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (env in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let morpho_api_url = lookup("MORPHO_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| MORPHO_API_URL.to_string());

        let chain_ids = parse_chain_ids(&lookup("CHAIN_IDS").unwrap_or_else(|| "1".to_string()))?;

        let refresh_secs = lookup("REFRESH_INTERVAL_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60)
            .max(1);

        let timeout_secs = lookup("HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(10);

        Ok(Self {
            port,
            morpho_api_url,
            chain_ids,
            refresh_interval: Duration::from_secs(refresh_secs),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

pub fn parse_chain_ids(raw: &str) -> Result<Vec<u64>> {
    let mut ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let id = part
            .parse::<u64>()
            .with_context(|| format!("Invalid chain id {:?}", part))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    if ids.is_empty() {
        bail!("CHAIN_IDS must name at least one chain");
    }
    Ok(ids)
}

pub fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate dir when launched from elsewhere
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let candidate = manifest_dir.join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}
