//! Request DTOs.

pub mod request;

pub use request::NetworkRequest;
