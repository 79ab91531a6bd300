//! External publish path for multi-node deployments.

use async_trait::async_trait;
use serde_json::Value;

use hive_core::result::AppResult;

use super::topic::Topic;

/// Propagates bus traffic beyond this process.
#[async_trait]
pub trait ExternalPublisher: Send + Sync + std::fmt::Debug {
    async fn publish(&self, topic: &Topic, payload: &Value) -> AppResult<()>;
}

/// Single-node deployments.
#[derive(Debug, Clone, Default)]
pub struct NoopPublisher;

#[async_trait]
impl ExternalPublisher for NoopPublisher {
    async fn publish(&self, _topic: &Topic, _payload: &Value) -> AppResult<()> {
        Ok(())
    }
}

/// Prefix of every Redis channel the bus publishes to.
pub const CHANNEL_PREFIX: &str = "hive";

fn channel_name(topic: &Topic) -> String {
    format!("{CHANNEL_PREFIX}:{topic}")
}

#[cfg(feature = "redis-pubsub")]
mod implementation {
    use async_trait::async_trait;
    use serde_json::Value;
    use tracing::debug;

    use hive_core::AppError;
    use hive_core::result::AppResult;

    use super::{ExternalPublisher, Topic, channel_name};

    /// Publishes bus traffic to Redis channels.
    #[derive(Debug, Clone)]
    pub struct RedisPublisher {
        client: redis::Client,
    }

    impl RedisPublisher {
        pub fn new(url: &str) -> AppResult<Self> {
            let client = redis::Client::open(url)
                .map_err(|e| AppError::configuration(format!("Invalid Redis URL: {e}")))?;
            Ok(Self { client })
        }
    }

    #[async_trait]
    impl ExternalPublisher for RedisPublisher {
        async fn publish(&self, topic: &Topic, payload: &Value) -> AppResult<()> {
            let mut conn = self
                .client
                .get_multiplexed_async_connection()
                .await
                .map_err(|e| AppError::internal(format!("Redis connection failed: {e}")))?;

            let channel = channel_name(topic);
            let receivers = redis::cmd("PUBLISH")
                .arg(&channel)
                .arg(payload.to_string())
                .query_async::<i64>(&mut conn)
                .await
                .map_err(|e| AppError::internal(format!("Redis PUBLISH failed: {e}")))?;

            debug!(channel, receivers, "Published to Redis");
            Ok(())
        }
    }
}

#[cfg(not(feature = "redis-pubsub"))]
mod implementation {
    use async_trait::async_trait;
    use serde_json::Value;

    use hive_core::AppError;
    use hive_core::result::AppResult;

    use super::{ExternalPublisher, Topic, channel_name};

    /// Stub publisher when the `redis-pubsub` feature is disabled.
    #[derive(Debug, Clone)]
    pub struct RedisPublisher;

    impl RedisPublisher {
        pub fn new(_url: &str) -> AppResult<Self> {
            Ok(Self)
        }
    }

    #[async_trait]
    impl ExternalPublisher for RedisPublisher {
        async fn publish(&self, topic: &Topic, _payload: &Value) -> AppResult<()> {
            Err(AppError::configuration(format!(
                "Cannot publish to '{}': built without the redis-pubsub feature",
                channel_name(topic)
            )))
        }
    }
}

pub use implementation::RedisPublisher;
