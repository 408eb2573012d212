//! Shared helpers: stub backends served on ephemeral ports and a configured proxy app.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::Router;
use detector_proxy_core::config::{keys, Config};
use detector_proxy_core::proxy::{create_app, AppState};

pub const BOUNDARY: &str = "----detector-proxy-test-7MA4YWxkTrZu0gW";

/// Serve `router` on 127.0.0.1 with an OS-assigned port.
pub async fn spawn_backend(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[derive(Clone, Default)]
pub struct HitCounter(Arc<AtomicUsize>);

impl HitCounter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn test_config(icons_url: &str, detect_url: &str) -> Config {
    let mut config = Config::default();
    config.apply_settings([
        (keys::YOLO_RETRAIN, "http://yolo.test/retrain"),
        (keys::YOLO_ADD_TRAIN_IMAGE, "http://yolo.test/add"),
        (keys::YOLO_BOUNDING_BOXES, "http://yolo.test/detect"),
        (keys::RETINANET_RETRAIN, "http://retina.test/retrain"),
        (keys::RETINANET_ADD_TRAIN_IMAGE, "http://retina.test/add"),
        (keys::RETINANET_BOUNDING_BOXES, "http://retina.test/boxes"),
        (keys::ICONS_BACKEND_URL, icons_url),
        (keys::DETECT_BACKEND_URL, detect_url),
    ]);
    config.timeouts.request_timeout = 5;
    config
}

pub fn proxy_app(config: &Config) -> Router {
    create_app(AppState::from_config(config).unwrap())
}

/// Encode form fields as `multipart/form-data`. Returns (content type, body).
pub fn multipart(fields: &[(&str, Option<&str>, &[u8])]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, filename, data) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let disposition = match filename {
            Some(file) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                name, file
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}
