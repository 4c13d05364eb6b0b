//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::{sample_info_json, sample_metadata, test_config, BackendServer, VIDEO_URL};
