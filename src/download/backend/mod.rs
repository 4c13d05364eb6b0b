//! Backend collaborator abstraction.
//!
//! The backend owns everything hard (extraction, format negotiation, muxing). The
//! client only needs two calls, captured by the `Backend` trait so the session can be
//! driven by the real HTTP backend or by a test double.
//!
//! Built-in backends:
//! - `HttpBackend`: JSON metadata + streamed binary download over reqwest

pub mod http;

use crate::core::error::AppError;
use crate::download::models::{DownloadPayload, DownloadRequest, VideoMetadata};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub use http::HttpBackend;

/// Body bytes received so far for one download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub received: u64,
    /// From Content-Length, when the backend sent one
    pub total: Option<u64>,
}

impl TransferProgress {
    /// Percentage (0-100) when the total is known.
    pub fn percent(&self) -> Option<u8> {
        match self.total {
            Some(total) if total > 0 => Some(((self.received.min(total) * 100) / total) as u8),
            _ => None,
        }
    }
}

/// Trait for backend implementations.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Human-readable name of this backend (for logging)
    fn name(&self) -> &str;

    /// Fetch metadata and the available formats for a (pre-validated) URL.
    async fn fetch_info(&self, url: &str) -> Result<VideoMetadata, AppError>;

    /// Download the converted file.
    ///
    /// Implementations must stop promptly once `cancel` fires and return
    /// `AppError::Cancelled`. Progress is best-effort; a closed receiver is not an error.
    async fn download(
        &self,
        request: &DownloadRequest,
        cancel: CancellationToken,
        progress_tx: mpsc::UnboundedSender<TransferProgress>,
    ) -> Result<DownloadPayload, AppError>;
}
