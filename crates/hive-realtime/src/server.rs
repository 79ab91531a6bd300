//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use hive_core::config::RealtimeConfig;
use hive_core::result::AppResult;
use hive_entity::Storage;

use crate::bus::{ExternalPublisher, MessageBus, NoopPublisher, RedisPublisher};
use crate::dispatcher::{Dispatcher, DispatcherSettings};
use crate::message::OutboundMessage;
use crate::session::{Session, SessionRegistry};
use crate::worker::WorkerPool;

/// Central real-time engine: session registry, message bus, dispatcher and
/// worker pool.
#[derive(Clone)]
pub struct RealtimeEngine {
    pub sessions: Arc<SessionRegistry>,
    pub bus: Arc<MessageBus>,
    pub dispatcher: Arc<Dispatcher>,
    workers: WorkerPool,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("sessions", &self.sessions.count())
            .field("topics", &self.bus.topic_count())
            .field("workers", &self.workers.size())
            .finish()
    }
}

impl RealtimeEngine {
    pub fn new(
        config: &RealtimeConfig,
        storage: Storage,
        rest_server_url: Option<String>,
    ) -> AppResult<Self> {
        let publisher: Arc<dyn ExternalPublisher> = match &config.redis_url {
            Some(url) => {
                if !cfg!(feature = "redis-pubsub") {
                    warn!("redis_url is set but the redis-pubsub feature is disabled");
                }
                Arc::new(RedisPublisher::new(url)?)
            }
            None => Arc::new(NoopPublisher),
        };

        let bus = Arc::new(MessageBus::new(storage.clone(), publisher));
        let dispatcher = Arc::new(Dispatcher::new(
            storage,
            bus.clone(),
            DispatcherSettings {
                rest_server_url,
                max_message_size: config.max_message_size,
                allow_network_autocreate: config.allow_network_autocreate,
            },
        ));

        info!(workers = config.worker_pool_size, "Real-time engine initialized");

        Ok(Self {
            sessions: Arc::new(SessionRegistry::new()),
            bus,
            dispatcher,
            workers: WorkerPool::new(config.worker_pool_size),
        })
    }

    /// Register a new connection.
    pub fn open_session(&self) -> (Arc<Session>, mpsc::UnboundedReceiver<OutboundMessage>) {
        self.sessions.register()
    }

    /// Process one inbound text frame on a pooled worker; the response is
    /// queued on the session when done.
    pub fn handle_frame(&self, session: &Arc<Session>, text: String) -> JoinHandle<()> {
        let dispatcher = self.dispatcher.clone();
        let session = session.clone();
        self.workers.spawn(async move {
            let response = dispatcher.dispatch(&session, &text).await;
            session.send(response);
        })
    }

    /// Close a connection and release its subscriptions. Idempotent.
    pub async fn close_session(&self, session: &Arc<Session>) {
        self.sessions.remove(&session.id());
        session.close();
        self.bus.release(session).await;
    }

    /// Stop accepting work and close every session.
    pub fn shutdown(&self) {
        info!(sessions = self.sessions.count(), "Shutting down real-time engine");
        self.workers.close();
        self.sessions.close_all();
    }
}
