// Session state machines and the single-slot in-flight download

use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::download::models::{DownloadRequest, VideoMetadata};

/// Metadata fetch lifecycle: Idle → Fetching → {Displayed, Failed}.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Fetching {
        generation: u64,
    },
    Displayed,
    Failed {
        message: String,
    },
}

impl FetchState {
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching { .. })
    }
}

/// Download lifecycle: Idle → Requesting → {Saving → Completed, Cancelled, Failed}.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DownloadState {
    #[default]
    Idle,
    Requesting {
        attempt: u64,
    },
    /// Payload received, handed to the saver
    Saving {
        attempt: u64,
        filename: String,
    },
    Completed {
        attempt: u64,
        path: PathBuf,
    },
    Cancelled,
    Failed {
        message: String,
    },
}

impl DownloadState {
    /// No further events can move this attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::Cancelled | Self::Failed { .. }
        )
    }
}

/// Metadata together with the URL it was fetched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentVideo {
    pub url: String,
    pub metadata: VideoMetadata,
}

/// The one live download attempt. Dropping it out of its slot ends the attempt.
#[derive(Debug)]
pub struct InFlightDownload {
    pub attempt: u64,
    pub cancel: CancellationToken,
    pub request: DownloadRequest,
    /// Captured at start so a later fetch cannot rename this download
    pub title: String,
}
