//! Device session state and the registry of live sessions.

pub mod handle;
pub mod registry;
pub mod subscription;

pub use handle::{Session, SessionId};
pub use registry::SessionRegistry;
pub use subscription::SubscriptionSet;
