//! Detector Proxy Core Library
//! Endpoint resolution for the detection model families and the HTTP proxy in front of them

pub mod config;
pub mod models;
pub mod proxy;
