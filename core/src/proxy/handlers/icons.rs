//! Icon list handler
//! Handles GET /api/icons

use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};

use crate::proxy::error::ProxyError;
use crate::proxy::server::AppState;
use crate::proxy::validators::IconList;

const UNAVAILABLE: &str = "Internal error";

fn unavailable(source: reqwest::Error) -> ProxyError {
    ProxyError::BackendUnavailable { source, message: UNAVAILABLE }
}

/// Handle GET /api/icons
///
/// Fetches the icon list from the icon backend and relays it only if every
/// element is a URL.
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4().simple()))]
pub async fn handle_list_icons(State(state): State<AppState>) -> Result<Response, ProxyError> {
    let response = state
        .upstream
        .get_json(&state.backends.icons_url)
        .await
        .map_err(unavailable)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProxyError::BackendRejected {
            status,
            message: "Failed to fetch icons from backend",
        });
    }

    let body = response.bytes().await.map_err(unavailable)?;
    let icons = IconList::from_slice(&body)?;

    tracing::debug!("Relaying {} icon(s)", icons.len());
    Ok(Json(icons).into_response())
}
