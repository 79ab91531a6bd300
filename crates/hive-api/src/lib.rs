//! # hive-api
//!
//! HTTP API layer for the device hive built on Axum.
//!
//! Provides the device WebSocket upgrade, the `/network` REST endpoints,
//! access-key authentication, request DTOs and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
