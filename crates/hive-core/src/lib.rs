//! # hive-core
//!
//! Core crate for the device hive. Contains configuration schemas,
//! pagination/sorting/filter types, the generic repository trait, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other hive crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
