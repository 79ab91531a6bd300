//! Core traits implemented by the storage backends.

pub mod repository;

pub use repository::Repository;
