//! Image scan handler
//! Handles POST /api/scan by forwarding the multipart upload to the detection backend

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Multipart, Request, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::proxy::error::ProxyError;
use crate::proxy::server::AppState;

const IMAGE_FIELD: &str = "image";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
const UNAVAILABLE: &str = "Internal server error";

fn unavailable(source: reqwest::Error) -> ProxyError {
    ProxyError::BackendUnavailable { source, message: UNAVAILABLE }
}

/// Handle POST /api/scan
///
/// The upload is forwarded exactly as received, boundary included. The
/// backend's answer is buffered and returned with its own content type.
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4().simple()))]
pub async fn handle_scan(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ProxyError> {
    let (mut parts, body) = request.into_parts();

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .ok_or_else(|| ProxyError::Internal("scan request has no content type".to_string()))?;

    let body = axum::body::to_bytes(body, state.max_body_bytes)
        .await
        .map_err(|e| ProxyError::Internal(format!("failed to read scan request body: {}", e)))?;

    // Parse a copy that keeps the body limit installed by the router.
    let mut probe = Request::new(Body::from(body.clone()));
    *probe.headers_mut() = parts.headers.clone();
    *probe.extensions_mut() = std::mem::take(&mut parts.extensions);

    if !has_field(probe, IMAGE_FIELD).await? {
        return Err(ProxyError::ClientInput("Missing \"image\" field"));
    }

    tracing::debug!("Forwarding {} byte upload to {}", body.len(), state.backends.detect_url);

    let response = state
        .upstream
        .post_raw(&state.backends.detect_url, content_type, body)
        .await
        .map_err(unavailable)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProxyError::BackendRejected {
            status,
            message: "Failed to process image",
        });
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    let payload: Bytes = response.bytes().await.map_err(unavailable)?;

    Ok(([(header::CONTENT_TYPE, content_type)], payload).into_response())
}

/// Walk the multipart body looking for a field called `name`.
async fn has_field(request: Request, name: &str) -> Result<bool, ProxyError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ProxyError::Internal(format!("not a multipart request: {}", e.body_text())))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProxyError::Internal(format!("malformed multipart body: {}", e)))?
    {
        if field.name() == Some(name) {
            return Ok(true);
        }
    }

    Ok(false)
}
