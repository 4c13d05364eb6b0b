//! Core utilities, configuration, errors and logging

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;
pub mod validation;

// Re-exports for convenience
pub use error::{AppError, AppResult, ErrorKind};
pub use logging::init_logger;
