//! Core type definitions used across the workspace.

pub mod filter;
pub mod pagination;
pub mod sorting;

pub use filter::NamePattern;
pub use pagination::Page;
pub use sorting::{Sort, SortDirection};
