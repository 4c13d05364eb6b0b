//! Mock implementations of the session's collaborators
//!
//! Lets the session be driven without network or filesystem access.

pub mod mock_backend;

pub use mock_backend::{payload, MockBackend, RecordingSaver, Reply};
