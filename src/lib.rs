//! Tubefetch - command-line client for a YouTube conversion backend
//!
//! The backend does the extraction and conversion. This crate validates input,
//! asks the backend for video metadata, drives the download lifecycle (with
//! cancellation) and saves the resulting file locally.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, validation and formatting helpers
//! - `download`: Wire models, the `Backend` trait with its HTTP implementation, saving
//! - `session`: View model, state machines and the runtime executing their effects
//! - `cli`: Command-line interface

pub mod cli;
pub mod core;
pub mod download;
pub mod session;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use download::{Backend, DiskSaver, FileSaver, HttpBackend};
pub use session::{Controller, SessionRuntime};
