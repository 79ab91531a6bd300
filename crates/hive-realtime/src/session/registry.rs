//! Registry of live sessions.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::info;

use super::handle::{Session, SessionId};
use crate::message::OutboundMessage;

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session. The receiver is the transmitter side the socket
    /// writer reads from.
    pub fn register(&self) -> (Arc<Session>, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Arc::new(Session::new(tx));
        self.sessions.insert(session.id(), session.clone());
        info!(session_id = %session.id(), total = self.sessions.len(), "Session opened");
        (session, rx)
    }

    pub fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.get(id).map(|s| s.value().clone())
    }

    /// Close and forget a session. Safe to call more than once.
    pub fn remove(&self, id: &SessionId) -> Option<Arc<Session>> {
        let (_, session) = self.sessions.remove(id)?;
        session.close();
        info!(session_id = %id, total = self.sessions.len(), "Session closed");
        Some(session)
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Close every session.
    pub fn close_all(&self) {
        for entry in self.sessions.iter() {
            entry.value().close();
        }
        self.sessions.clear();
    }
}
