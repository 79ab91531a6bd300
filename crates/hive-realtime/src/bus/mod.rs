//! Topic-based delivery of commands, notifications and command updates to
//! subscribed sessions, plus the external publish path.

pub mod message_bus;
pub mod publisher;
pub mod topic;

pub use message_bus::MessageBus;
pub use publisher::{ExternalPublisher, NoopPublisher, RedisPublisher};
pub use topic::Topic;
