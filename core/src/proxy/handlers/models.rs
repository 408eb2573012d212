//! Model endpoint lookup
//! Handles /api/models and /api/models/:model/endpoints

use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::models::{EndpointBundle, ModelSelector};
use crate::proxy::error::ProxyError;
use crate::proxy::server::AppState;

/// Handle GET /api/models
pub async fn handle_list_models() -> Json<Vec<&'static str>> {
    Json(ModelSelector::ALL.iter().map(ModelSelector::as_str).collect())
}

/// Handle GET /api/models/:model/endpoints
pub async fn handle_model_endpoints(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<Json<EndpointBundle>, ProxyError> {
    let bundle = state.resolver.resolve_name(&model)?;
    Ok(Json(bundle.clone()))
}
