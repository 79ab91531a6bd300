//! Access key entities.

pub mod model;
pub mod permission;

pub use model::AccessKey;
pub use permission::{AccessKeyPermission, actions};
