//! The shared chart controller.

use std::sync::Arc;

use axum::{
    extract::{MatchedPath, State},
    Json,
};
use tracing::debug;

use chartkit_core::ChartError;

use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// GET handler bound to every chart route.
///
/// The chart name is the final segment of the registered route path. The
/// controller resolves it through the store and returns the chart's own
/// payload; an unbound name answers 404.
pub async fn charts_controller(
    State(state): State<Arc<AppState>>,
    matched: MatchedPath,
) -> Result<Json<serde_json::Value>> {
    let name = chart_name_from_path(matched.as_str());
    let key = format!("{}.{}", state.config.cache_key_prefix, name);

    let binding = state
        .store
        .get(&key)
        .ok_or_else(|| ChartError::ChartNotFound(name.to_owned()))
        .map_err(ApiError::from)?;

    let payload = binding.chart.respond().await.map_err(ApiError::from)?;

    debug!(chart = %name, chart_type = %binding.chart_type, "served chart payload");
    Ok(Json(payload))
}

/// Extracts the chart name from a registered route path.
fn chart_name_from_path(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}
