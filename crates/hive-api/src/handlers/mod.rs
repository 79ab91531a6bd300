//! HTTP and WebSocket handlers.

pub mod health;
pub mod network;
pub mod ws;
