//! # hive-realtime
//!
//! Real-time WebSocket engine for device sessions. Provides:
//!
//! - Session registry with per-session subscription locks and pending queues
//! - Message bus for commands, notifications and command updates, with
//!   history replay on subscribe
//! - Action dispatcher for device frames
//! - Bounded worker pool
//! - Optional Redis publish path for multi-node deployments

pub mod bus;
pub mod dispatcher;
pub mod message;
pub mod server;
pub mod session;
pub mod worker;

pub use bus::{MessageBus, Topic};
pub use dispatcher::Dispatcher;
pub use server::RealtimeEngine;
pub use session::{Session, SessionRegistry};
pub use worker::WorkerPool;
