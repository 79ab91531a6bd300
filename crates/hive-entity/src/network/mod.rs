//! Network domain entities.

pub mod filter;
pub mod model;

pub use filter::{NetworkFilter, NetworkSortField};
pub use model::{Network, NetworkUpdate};
