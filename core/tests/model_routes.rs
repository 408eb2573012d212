//! Model listing, endpoint lookup and health routes

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{proxy_app, test_config};

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn app() -> axum::Router {
    proxy_app(&test_config("http://127.0.0.1:9/api/icons", "http://127.0.0.1:9/yolo/detect"))
}

#[tokio::test]
async fn lists_supported_models() {
    let response = app().oneshot(get("/api/models")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!(["YOLO", "RETINANET"]));
}

#[tokio::test]
async fn resolves_yolo_endpoints() {
    let response = app().oneshot(get("/api/models/yolo/endpoints")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "retrainEndpoint": "http://yolo.test/retrain",
            "addImageEndpoint": "http://yolo.test/add",
            "boundingBoxesEndpoint": "http://yolo.test/detect"
        })
    );
}

#[tokio::test]
async fn resolves_retinanet_endpoints() {
    let response = app().oneshot(get("/api/models/RETINANET/endpoints")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["boundingBoxesEndpoint"], "http://retina.test/boxes");
}

#[tokio::test]
async fn unknown_model_is_not_found() {
    let response = app().oneshot(get("/api/models/ssd/endpoints")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_check_responds() {
    let response = app().oneshot(get("/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"status": "ok"}));
}

#[test]
fn incomplete_config_is_rejected_at_startup() {
    let mut config = test_config("http://127.0.0.1:9/api/icons", "http://127.0.0.1:9/yolo/detect");
    config.models.retinanet.bounding_boxes = None;

    assert!(detector_proxy_core::proxy::AppState::from_config(&config).is_err());
}

#[test]
fn backend_urls_from_config_file_are_trimmed() {
    let mut config = test_config("http://127.0.0.1:9/api/icons", "http://127.0.0.1:9/yolo/detect");
    config.backends.icons_url = "  http://icons.test/api/icons \n".to_string();

    let state = detector_proxy_core::proxy::AppState::from_config(&config).unwrap();

    assert_eq!(state.backends.icons_url, "http://icons.test/api/icons");
}
