use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Underlying token a vault accepts deposits in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultAsset {
    /// Group key; the only field a record cannot be decoded without.
    pub address: String,
    #[serde(rename = "logoURI", default, deserialize_with = "de_string_opt")]
    pub logo_uri: Option<String>,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub symbol: String,
    #[serde(default, deserialize_with = "de_u32_lenient")]
    pub decimals: u32,
}

/// Yield/allocation state of a vault at the snapshot block.
///
/// Every numeric field is optional: upstream BigInt scalars arrive as strings
/// and some vaults report `null` before their first harvest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VaultState {
    #[serde(deserialize_with = "de_string_lenient")]
    pub id: String,
    #[serde(deserialize_with = "de_f64_opt")]
    pub apy: Option<f64>,
    #[serde(deserialize_with = "de_f64_opt")]
    pub net_apy: Option<f64>,
    #[serde(deserialize_with = "de_f64_opt")]
    pub total_assets: Option<f64>,
    #[serde(deserialize_with = "de_f64_opt")]
    pub total_assets_usd: Option<f64>,
    #[serde(deserialize_with = "de_f64_opt")]
    pub fee: Option<f64>,
    #[serde(deserialize_with = "de_u64_opt")]
    pub timelock: Option<u64>,
}

/// One vault as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultRecord {
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub address: String,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub symbol: String,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "de_u32_lenient")]
    pub decimals: u32,
    #[serde(default, deserialize_with = "de_u64_lenient")]
    pub creation_block_number: u64,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub creation_timestamp: String,
    #[serde(default, deserialize_with = "de_string_lenient")]
    pub creator_address: String,
    #[serde(default, deserialize_with = "de_bool_lenient")]
    pub whitelisted: bool,
    pub asset: VaultAsset,
    #[serde(default, deserialize_with = "de_state_lenient")]
    pub state: VaultState,
}

impl VaultRecord {
    /// Whitelisted with a strictly positive net APY. Missing or NaN yields are
    /// never eligible.
    pub fn is_eligible(&self) -> bool {
        self.whitelisted && self.state.net_apy.is_some_and(|apy| apy > 0.0)
    }
}

/// All eligible vaults for one underlying asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetGroup {
    pub address: String,
    #[serde(rename = "logoURI")]
    pub logo_uri: Option<String>,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub vaults: Vec<VaultRecord>,
}

impl AssetGroup {
    /// Empty group carrying the asset's display attributes.
    pub fn seeded(asset: &VaultAsset) -> Self {
        Self {
            address: asset.address.clone(),
            logo_uri: asset.logo_uri.clone(),
            name: asset.name.clone(),
            symbol: asset.symbol.clone(),
            decimals: asset.decimals,
            vaults: Vec::new(),
        }
    }
}

fn de_state_lenient<'de, D>(deserializer: D) -> Result<VaultState, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    if v.is_null() {
        return Ok(VaultState::default());
    }
    Ok(serde_json::from_value(v).unwrap_or_else(|e| {
        warn!(error = %e, "unreadable vault state, treating as empty");
        VaultState::default()
    }))
}

fn de_string_lenient<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn de_string_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

fn de_bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::Bool(b) => b,
        // Only a literal `true` counts; anything else keeps the vault hidden.
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

// Numeric decoders never fail: an unreadable value becomes `None` so the
// record still reaches the aggregator and is judged on what is readable.

fn de_f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>()
                    .map_err(|e| warn!(value = %s, error = %e, "unparseable decimal field"))
                    .ok()
            }
        }
        other => {
            warn!(value = %other, "non-numeric decimal field");
            None
        }
    })
}

fn de_u64_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::Null => None,
        Value::Number(n) => {
            let parsed = n.as_u64();
            if parsed.is_none() {
                warn!(value = %n, "integer field out of range");
            }
            parsed
        }
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<u64>()
                    .map_err(|e| warn!(value = %s, error = %e, "unparseable integer field"))
                    .ok()
            }
        }
        other => {
            warn!(value = %other, "non-numeric integer field");
            None
        }
    })
}

fn de_u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_u64_opt(deserializer)?.unwrap_or_default())
}

fn de_u32_lenient<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = de_u64_opt(deserializer)?.unwrap_or_default();
    Ok(u32::try_from(raw).unwrap_or_else(|_| {
        warn!(value = raw, "decimals out of range, using 0");
        0
    }))
}
