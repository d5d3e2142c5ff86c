use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::models::AssetGroup;
use crate::vault::{AssetBoard, BoardSnapshot, VaultHighlights};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<AssetBoard>,
}

/// Create the API router
pub fn create_router(board: Arc<AssetBoard>) -> Router {
    let state = AppState { board };

    Router::new()
        .route("/health", get(health_check))
        .route("/api/assets/:chain_id", get(get_assets))
        .route("/api/assets/:chain_id/:asset_address", get(get_asset))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ===== Route Handlers =====

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        chains: state.board.chains(),
    })
}

/// All assets with at least one eligible vault on `chain_id`
async fn get_assets(
    State(state): State<AppState>,
    Path(chain_id): Path<u64>,
) -> Result<Json<AssetsResponse>, ApiError> {
    let snapshot = published(&state, chain_id)?;

    let assets: Vec<AssetView> = snapshot.groups.iter().map(AssetView::from_group).collect();

    Ok(Json(AssetsResponse {
        chain_id,
        refreshed_at: snapshot.refreshed_at,
        record_count: snapshot.record_count,
        count: assets.len(),
        assets,
    }))
}

/// A single asset group by underlying token address
async fn get_asset(
    State(state): State<AppState>,
    Path((chain_id, asset_address)): Path<(u64, String)>,
) -> Result<Json<AssetView>, ApiError> {
    let snapshot = published(&state, chain_id)?;

    snapshot
        .group(&asset_address)
        .map(|g| Json(AssetView::from_group(g)))
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "No eligible vaults for asset {} on chain {}",
                asset_address, chain_id
            ))
        })
}

fn published(state: &AppState, chain_id: u64) -> Result<Arc<BoardSnapshot>, ApiError> {
    state.board.snapshot(chain_id).ok_or_else(|| {
        ApiError::Unavailable(format!("No vault snapshot for chain {} yet", chain_id))
    })
}

// ===== Request/Response Types =====

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    chains: Vec<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssetsResponse {
    chain_id: u64,
    refreshed_at: DateTime<Utc>,
    record_count: usize,
    count: usize,
    assets: Vec<AssetView>,
}

#[derive(Serialize)]
struct AssetView {
    #[serde(flatten)]
    group: AssetGroup,
    highlights: VaultHighlights,
}

impl AssetView {
    fn from_group(group: &AssetGroup) -> Self {
        Self {
            highlights: VaultHighlights::for_group(group),
            group: group.clone(),
        }
    }
}

// ===== Error Handling =====

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    /// No snapshot published for the chain yet.
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unavailable(msg) => {
                tracing::debug!("{}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{VaultAsset, VaultRecord, VaultState};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn vault(address: &str, asset: &str, whitelisted: bool, net_apy: f64) -> VaultRecord {
        VaultRecord {
            address: address.to_string(),
            symbol: "mv".to_string(),
            name: address.to_string(),
            decimals: 18,
            creation_block_number: 1,
            creation_timestamp: "0".to_string(),
            creator_address: "0xcreator".to_string(),
            whitelisted,
            asset: VaultAsset {
                address: asset.to_string(),
                logo_uri: Some("https://cdn.example/t.svg".to_string()),
                name: "Token".to_string(),
                symbol: "TKN".to_string(),
                decimals: 18,
            },
            state: VaultState {
                net_apy: Some(net_apy),
                total_assets_usd: Some(1000.0),
                ..Default::default()
            },
        }
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let resp = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn board() -> Arc<AssetBoard> {
        let board = Arc::new(AssetBoard::new());
        board.publish(
            1,
            vec![
                vault("0xv1", "0xAsset", true, 0.05),
                vault("0xv2", "0xOther", false, 0.05),
                vault("0xv3", "0xAsset", true, 0.02),
            ],
        );
        board
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(create_router(board()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["chains"], json!([1]));
    }

    #[tokio::test]
    async fn test_assets_listing() {
        let (status, body) = get_json(create_router(board()), "/api/assets/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chainId"], 1);
        assert_eq!(body["recordCount"], 3);
        assert_eq!(body["count"], 1);

        let asset = &body["assets"][0];
        assert_eq!(asset["address"], "0xAsset");
        assert_eq!(asset["logoURI"], "https://cdn.example/t.svg");
        assert_eq!(asset["vaults"].as_array().unwrap().len(), 2);
        assert_eq!(asset["highlights"]["highApy"][0]["address"], "0xv1");
        assert_eq!(asset["highlights"]["highTvl"]["address"], "0xv1");
    }

    #[tokio::test]
    async fn test_chain_without_snapshot_is_503() {
        let router = create_router(board());

        let (status, body) = get_json(router.clone(), "/api/assets/10").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("chain 10"));

        let (status, _) = get_json(router, "/api/assets/10/0xAsset").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_single_asset_lookup() {
        let router = create_router(board());

        let (status, body) = get_json(router.clone(), "/api/assets/1/0xasset").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "TKN");

        // Seen upstream but pruned: no eligible vaults.
        let (status, _) = get_json(router, "/api/assets/1/0xOther").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
