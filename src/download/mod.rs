//! Download management: wire models, backend access, filenames and saving

pub mod backend;
pub mod filename;
pub mod models;
pub mod save;

// Re-exports for convenience
pub use backend::{Backend, HttpBackend, TransferProgress};
pub use models::{DownloadPayload, DownloadRequest, FormatKind, FormatOption, VideoMetadata};
pub use save::{DiskSaver, FileSaver};
