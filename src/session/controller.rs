//! Download-lifecycle state machine.
//!
//! `Controller::handle` is a pure transition function: it takes one named event,
//! updates the view model and the two single-slot fields (current metadata and the
//! in-flight download), and returns the side effects the runtime must perform.
//! Nothing here touches the network, the disk or the clock.
//!
//! # Transition table
//!
//! | Event | From | To | Effects |
//! |---|---|---|---|
//! | `Submit` (valid) | fetch not running | `Fetching` | `FetchInfo` |
//! | `Submit` (invalid) | any | unchanged | error notice |
//! | `FetchFinished` ok | `Fetching{g}` | `Displayed` | none |
//! | `FetchFinished` err | `Fetching{g}` | `Failed` | error notice |
//! | `Download` | no metadata | unchanged | error notice |
//! | `Download` | not in flight | `Requesting` | `StartDownload` |
//! | `Cancel` | `Requesting` | `Cancelled` | info notice |
//! | `DownloadFinished` ok | `Requesting{a}` | `Saving` | `Save` |
//! | `DownloadFinished` err | `Requesting{a}` | `Failed` | error notice |
//! | `SaveFinished` ok | `Saving{a}` | `Completed` | `HideProgressAfter` |
//!
//! Completions whose generation/attempt no longer matches are ignored, which is how a
//! success that races a cancel ends up as a no-op.

use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::core::config;
use crate::core::error::AppError;
use crate::core::utils::{format_bytes, format_file_size};
use crate::core::validation::validate_youtube_url;
use crate::download::backend::TransferProgress;
use crate::download::filename::resolve_filename;
use crate::download::models::{DownloadPayload, DownloadRequest, FormatKind, VideoMetadata};
use crate::session::state::{CurrentVideo, DownloadState, FetchState, InFlightDownload};
use crate::session::view::{MetadataPanel, Notice, NoticeLevel, QualityOption, ViewModel};

pub const FETCH_FAILED: &str = "Failed to fetch video information";
pub const DOWNLOAD_FAILED: &str = "Download failed";
pub const SAVE_FAILED: &str = "Failed to save file";
pub const DOWNLOAD_CANCELLED: &str = "Download cancelled";
pub const PREPARING: &str = "Preparing download...";
pub const COMPLETED: &str = "Download complete!";

/// Named inputs to the state machine.
#[derive(Debug)]
pub enum Event {
    /// User submitted a URL
    Submit(String),
    SelectKind(FormatKind),
    SelectQuality(String),
    /// User pressed the download control
    Download,
    /// User pressed the cancel control
    Cancel,
    FetchFinished {
        generation: u64,
        result: Result<VideoMetadata, AppError>,
    },
    DownloadProgress {
        attempt: u64,
        progress: TransferProgress,
    },
    DownloadFinished {
        attempt: u64,
        result: Result<DownloadPayload, AppError>,
    },
    SaveFinished {
        attempt: u64,
        result: Result<PathBuf, AppError>,
    },
    DismissNotice(u64),
    HideProgress {
        attempt: u64,
    },
}

/// Side effects requested by a transition.
#[derive(Debug)]
pub enum Effect {
    FetchInfo {
        generation: u64,
        url: String,
    },
    StartDownload {
        attempt: u64,
        request: DownloadRequest,
        cancel: CancellationToken,
    },
    Save {
        attempt: u64,
        filename: String,
        payload: DownloadPayload,
    },
    DismissNoticeAfter {
        id: u64,
        after: Duration,
    },
    HideProgressAfter {
        attempt: u64,
        after: Duration,
    },
}

/// Owns the session: view model, current metadata, in-flight download.
#[derive(Debug, Default)]
pub struct Controller {
    view: ViewModel,
    fetch: FetchState,
    download: DownloadState,
    current: Option<CurrentVideo>,
    in_flight: Option<InFlightDownload>,
    /// URL of the running fetch, promoted to `current` on success
    pending_url: Option<String>,
    last_generation: u64,
    last_attempt: u64,
    last_notice: u64,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    pub fn download_state(&self) -> &DownloadState {
        &self.download
    }

    pub fn current(&self) -> Option<&CurrentVideo> {
        self.current.as_ref()
    }

    pub fn metadata(&self) -> Option<&VideoMetadata> {
        self.current.as_ref().map(|c| &c.metadata)
    }

    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Apply one event and return the effects to run.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Submit(raw) => self.on_submit(&raw),
            Event::SelectKind(kind) => {
                self.select_kind(kind);
                Vec::new()
            }
            Event::SelectQuality(quality) => {
                self.select_quality(&quality);
                Vec::new()
            }
            Event::Download => self.on_download(),
            Event::Cancel => self.on_cancel(),
            Event::FetchFinished { generation, result } => self.on_fetch_finished(generation, result),
            Event::DownloadProgress { attempt, progress } => {
                self.on_progress(attempt, progress);
                Vec::new()
            }
            Event::DownloadFinished { attempt, result } => self.on_download_finished(attempt, result),
            Event::SaveFinished { attempt, result } => self.on_save_finished(attempt, result),
            Event::DismissNotice(id) => {
                self.view.notices.retain(|n| n.id != id);
                Vec::new()
            }
            Event::HideProgress { attempt } => {
                if matches!(self.download, DownloadState::Completed { attempt: a, .. } if a == attempt) {
                    self.view.progress_visible = false;
                }
                Vec::new()
            }
        }
    }

    // ==================== Metadata fetch ====================

    fn on_submit(&mut self, raw: &str) -> Vec<Effect> {
        if !self.view.fetch_enabled {
            log::warn!("Submit ignored: a metadata fetch is already running");
            return Vec::new();
        }

        let url = match validate_youtube_url(raw) {
            Ok(url) => url.to_string(),
            Err(e) => {
                log::debug!("Rejected URL before any network call: {:?}", raw);
                return self.notify(NoticeLevel::Error, e.to_string());
            }
        };

        self.last_generation += 1;
        let generation = self.last_generation;
        log::info!("🔍 Fetching video info for {} (generation {})", url, generation);

        self.fetch = FetchState::Fetching { generation };
        self.pending_url = Some(url.clone());
        self.current = None;
        self.view.fetch_enabled = false;
        self.view.loading_visible = true;
        self.view.panel = None;
        self.view.quality_options.clear();
        self.view.selected_quality = None;
        self.view.notices.retain(|n| n.level != NoticeLevel::Error);
        self.refresh_estimated_size();

        vec![Effect::FetchInfo { generation, url }]
    }

    fn on_fetch_finished(&mut self, generation: u64, result: Result<VideoMetadata, AppError>) -> Vec<Effect> {
        if self.fetch != (FetchState::Fetching { generation }) {
            log::debug!("Stale fetch result ignored (generation {})", generation);
            return Vec::new();
        }

        self.view.loading_visible = false;
        self.view.fetch_enabled = true;

        match result {
            Ok(metadata) => {
                let url = self.pending_url.take().unwrap_or_default();
                log::info!("Video info displayed: {} ({} formats)", metadata.title, metadata.formats.len());

                self.view.panel = Some(MetadataPanel::from(&metadata));
                self.view.quality_options = QualityOption::list_for(&metadata);
                self.view.selected_quality = self.view.quality_options.first().map(|o| o.value.clone());
                self.current = Some(CurrentVideo { url, metadata });
                self.fetch = FetchState::Displayed;
                self.select_kind(FormatKind::Video);
                Vec::new()
            }
            Err(e) => {
                let message = e.user_message(FETCH_FAILED);
                log::warn!("Video info fetch failed: {}", e);
                self.pending_url = None;
                self.fetch = FetchState::Failed {
                    message: message.clone(),
                };
                self.notify(NoticeLevel::Error, message)
            }
        }
    }

    // ==================== Selection panel ====================

    fn select_kind(&mut self, kind: FormatKind) {
        self.view.selected_kind = kind;
        self.view.quality_selector_visible = kind.has_quality();
        self.refresh_estimated_size();
    }

    fn select_quality(&mut self, quality: &str) {
        if !self.view.quality_options.iter().any(|o| o.value == quality) {
            log::warn!("Quality {} is not offered by the selector", quality);
            return;
        }
        self.view.selected_quality = Some(quality.to_string());
        self.refresh_estimated_size();
    }

    /// Size of the format matching the selector's value; absence is "unknown", never an error.
    fn refresh_estimated_size(&mut self) {
        let size = self.view.selected_quality.as_deref().and_then(|quality| {
            self.metadata()
                .and_then(|m| m.find_format(quality))
                .and_then(|f| f.known_size())
        });
        self.view.estimated_size = format_file_size(size);
    }

    // ==================== Download ====================

    fn on_download(&mut self) -> Vec<Effect> {
        if !self.view.download_enabled {
            log::warn!("Download ignored: another download is in flight");
            return Vec::new();
        }

        let Some(current) = self.current.as_ref() else {
            return self.notify(NoticeLevel::Error, AppError::NoMetadata.to_string());
        };

        let request = DownloadRequest {
            url: current.url.clone(),
            format: self.view.selected_kind,
            quality: self
                .view
                .selected_quality
                .clone()
                .unwrap_or_else(|| config::quality::FALLBACK_QUALITY.to_string()),
        };
        let title = current.metadata.title.clone();

        if let Some(previous) = self.in_flight.take() {
            log::warn!("Replacing in-flight download attempt {}", previous.attempt);
            previous.cancel.cancel();
        }

        self.last_attempt += 1;
        let attempt = self.last_attempt;
        let cancel = CancellationToken::new();
        log::info!("⬇️ Download started: attempt {}, format {}, quality {}", attempt, request.format, request.quality);

        self.in_flight = Some(InFlightDownload {
            attempt,
            cancel: cancel.clone(),
            request: request.clone(),
            title,
        });
        self.download = DownloadState::Requesting { attempt };
        self.view.progress_visible = true;
        self.view.progress_text = PREPARING.to_string();
        self.view.cancel_visible = true;
        self.view.download_enabled = false;

        vec![Effect::StartDownload {
            attempt,
            request,
            cancel,
        }]
    }

    fn on_cancel(&mut self) -> Vec<Effect> {
        let Some(flight) = self.in_flight.take() else {
            log::debug!("Cancel ignored: nothing in flight");
            return Vec::new();
        };

        flight.cancel.cancel();
        log::info!("⏹️ Download attempt {} cancelled by user", flight.attempt);
        self.reset_cancelled()
    }

    fn reset_cancelled(&mut self) -> Vec<Effect> {
        self.download = DownloadState::Cancelled;
        self.view.progress_visible = false;
        self.view.cancel_visible = false;
        self.view.download_enabled = true;
        self.notify(NoticeLevel::Info, DOWNLOAD_CANCELLED.to_string())
    }

    fn on_progress(&mut self, attempt: u64, progress: TransferProgress) {
        if self.download != (DownloadState::Requesting { attempt }) {
            return;
        }
        self.view.progress_text = match progress.percent() {
            Some(percent) => format!("Downloading... {}%", percent),
            None => format!("Downloading... {}", format_bytes(progress.received)),
        };
    }

    fn on_download_finished(&mut self, attempt: u64, result: Result<DownloadPayload, AppError>) -> Vec<Effect> {
        // Abort is authoritative: a completion for a cancelled or replaced attempt is a no-op
        let live = matches!(&self.in_flight, Some(f) if f.attempt == attempt && !f.cancel.is_cancelled());
        if !live {
            log::debug!("Completion for finished attempt {} ignored", attempt);
            return Vec::new();
        }
        let Some(flight) = self.in_flight.take() else {
            return Vec::new();
        };

        self.view.cancel_visible = false;

        match result {
            Ok(payload) => {
                let filename = resolve_filename(payload.filename.as_deref(), &flight.title, flight.request.format);
                self.download = DownloadState::Saving {
                    attempt,
                    filename: filename.clone(),
                };
                self.view.progress_text = format!("Saving {}...", filename);
                vec![Effect::Save {
                    attempt,
                    filename,
                    payload,
                }]
            }
            Err(e) if e.is_cancelled() => self.reset_cancelled(),
            Err(e) => {
                log::warn!("Download attempt {} failed: {}", attempt, e);
                self.fail_download(e.user_message(DOWNLOAD_FAILED))
            }
        }
    }

    fn on_save_finished(&mut self, attempt: u64, result: Result<PathBuf, AppError>) -> Vec<Effect> {
        if !matches!(&self.download, DownloadState::Saving { attempt: a, .. } if *a == attempt) {
            return Vec::new();
        }

        match result {
            Ok(path) => {
                log::info!("✅ Download attempt {} complete: {}", attempt, path.display());
                self.download = DownloadState::Completed { attempt, path };
                self.view.progress_text = COMPLETED.to_string();
                self.view.download_enabled = true;
                vec![Effect::HideProgressAfter {
                    attempt,
                    after: config::progress::hide_delay(),
                }]
            }
            Err(e) => {
                log::error!("Saving download attempt {} failed: {}", attempt, e);
                self.fail_download(SAVE_FAILED.to_string())
            }
        }
    }

    fn fail_download(&mut self, message: String) -> Vec<Effect> {
        self.download = DownloadState::Failed {
            message: message.clone(),
        };
        self.view.progress_visible = false;
        self.view.cancel_visible = false;
        self.view.download_enabled = true;
        self.notify(NoticeLevel::Error, message)
    }

    // ==================== Notices ====================

    fn notify(&mut self, level: NoticeLevel, text: String) -> Vec<Effect> {
        self.last_notice += 1;
        let id = self.last_notice;
        self.view.notices.push(Notice { id, level, text });
        vec![Effect::DismissNoticeAfter {
            id,
            after: config::notice::error_dismiss(),
        }]
    }
}
