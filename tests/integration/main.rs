//! End-to-end tests against the full server over the in-memory backend.

mod helpers;
mod network_test;
mod ws_test;
