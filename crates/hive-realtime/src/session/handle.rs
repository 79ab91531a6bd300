//! A single device WebSocket session.

use std::collections::VecDeque;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard, mpsc};
use tracing::debug;
use uuid::Uuid;

use hive_core::AppError;
use hive_core::result::AppResult;
use hive_entity::Device;

use super::subscription::SubscriptionSet;
use crate::message::OutboundMessage;

/// Unique session identifier.
pub type SessionId = Uuid;

/// A live connection.
///
/// Lifecycle: connected (no device), authenticated (device bound once),
/// closed. Subscription state lives behind an async lock owned by the
/// session; outbound messages are queued in `pending` and handed to the
/// transmitter task by [`drain_and_notify`](Self::drain_and_notify).
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    device: OnceLock<Device>,
    closed: AtomicBool,
    subscriptions: Mutex<SubscriptionSet>,
    pending: parking_lot::Mutex<VecDeque<OutboundMessage>>,
    transmitter: mpsc::UnboundedSender<OutboundMessage>,
    connected_at: DateTime<Utc>,
}

impl Session {
    pub fn new(transmitter: mpsc::UnboundedSender<OutboundMessage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            device: OnceLock::new(),
            closed: AtomicBool::new(false),
            subscriptions: Mutex::new(SubscriptionSet::default()),
            pending: parking_lot::Mutex::new(VecDeque::new()),
            transmitter,
            connected_at: Utc::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// The bound device, if authenticated.
    pub fn device(&self) -> Option<&Device> {
        self.device.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.device.get().is_some()
    }

    /// Bind `device` to this session. Binding the same device again is a
    /// no-op; a different device is rejected.
    pub fn bind_device(&self, device: Device) -> AppResult<()> {
        if self.is_closed() {
            return Err(AppError::authentication("Session is closed"));
        }
        let guid = device.guid.clone();
        let bound = self.device.get_or_init(|| device);
        if bound.guid == guid {
            debug!(session_id = %self.id, guid, "Device bound to session");
            Ok(())
        } else {
            Err(AppError::conflict(format!(
                "Session is already bound to device '{}'",
                bound.guid
            )))
        }
    }

    /// Acquire the subscription lock. Released when the guard drops.
    pub async fn lock_subscriptions(&self) -> MutexGuard<'_, SubscriptionSet> {
        self.subscriptions.lock().await
    }

    /// Append to the pending queue. Discarded once the session is closed.
    pub fn enqueue(&self, message: impl Into<OutboundMessage>) -> bool {
        if self.is_closed() {
            return false;
        }
        self.pending.lock().push_back(message.into());
        true
    }

    /// Hand everything queued so far to the transmitter.
    pub fn drain_and_notify(&self) -> usize {
        let mut pending = self.pending.lock();
        if self.is_closed() {
            pending.clear();
            return 0;
        }
        let mut sent = 0;
        while let Some(message) = pending.pop_front() {
            if self.transmitter.send(message).is_err() {
                // Receiver gone: the socket writer has exited.
                self.closed.store(true, Ordering::SeqCst);
                pending.clear();
                break;
            }
            sent += 1;
        }
        sent
    }

    /// Queue and flush in one step.
    pub fn send(&self, message: impl Into<OutboundMessage>) -> bool {
        let queued = self.enqueue(message);
        self.drain_and_notify();
        queued
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Transition to closed and drop anything still queued. Returns `true`
    /// for the call that actually closed the session.
    pub fn close(&self) -> bool {
        let first = !self.closed.swap(true, Ordering::SeqCst);
        self.pending.lock().clear();
        first
    }

    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }
}
