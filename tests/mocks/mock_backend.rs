//! Mock backend and saver
//!
//! The backend answers from canned replies, counts calls and can hold a download
//! open until the test releases it, optionally ignoring cancellation to reproduce a
//! completion that races the user's cancel.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Notify};
use tokio_util::sync::CancellationToken;
use tubefetch::core::error::AppError;
use tubefetch::download::backend::{Backend, TransferProgress};
use tubefetch::download::models::{DownloadPayload, DownloadRequest, VideoMetadata};
use tubefetch::download::save::FileSaver;

/// Canned answer for one backend call.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    /// Non-success status, optionally with an `error` message
    Error(Option<String>),
    /// The call panics, as a crashing extractor would
    Panic,
}

impl<T: Clone> Reply<T> {
    fn to_result(&self) -> Result<T, AppError> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Error(message) => Err(AppError::Backend {
                status: reqwest::StatusCode::BAD_REQUEST,
                message: message.clone(),
            }),
            Reply::Panic => panic!("mock backend crashed"),
        }
    }
}

pub struct MockBackend {
    info: Mutex<Reply<VideoMetadata>>,
    download: Mutex<Reply<DownloadPayload>>,
    progress: Vec<TransferProgress>,
    gate: Option<Arc<Notify>>,
    ignore_cancel: bool,
    info_calls: AtomicUsize,
    download_calls: AtomicUsize,
    last_request: Mutex<Option<DownloadRequest>>,
}

impl MockBackend {
    pub fn new(metadata: VideoMetadata) -> Self {
        Self {
            info: Mutex::new(Reply::Ok(metadata)),
            download: Mutex::new(Reply::Ok(payload(b"video-bytes", None))),
            progress: Vec::new(),
            gate: None,
            ignore_cancel: false,
            info_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_download(self, reply: Reply<DownloadPayload>) -> Self {
        *self.download.lock().unwrap() = reply;
        self
    }

    pub fn with_progress(mut self, progress: Vec<TransferProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Hold downloads until the returned `Notify` is signalled.
    pub fn gated(mut self, ignore_cancel: bool) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        self.ignore_cancel = ignore_cancel;
        (self, gate)
    }

    pub fn set_info(&self, reply: Reply<VideoMetadata>) {
        *self.info.lock().unwrap() = reply;
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<DownloadRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

pub fn payload(bytes: &'static [u8], filename: Option<&str>) -> DownloadPayload {
    DownloadPayload {
        bytes: Bytes::from_static(bytes),
        filename: filename.map(str::to_string),
        content_type: None,
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_info(&self, _url: &str) -> Result<VideoMetadata, AppError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.info.lock().unwrap().clone();
        reply.to_result()
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        cancel: CancellationToken,
        progress_tx: mpsc::UnboundedSender<TransferProgress>,
    ) -> Result<DownloadPayload, AppError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        for progress in &self.progress {
            let _ = progress_tx.send(*progress);
        }

        if let Some(gate) = &self.gate {
            if self.ignore_cancel {
                gate.notified().await;
            } else {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(AppError::Cancelled),
                    _ = gate.notified() => {}
                }
            }
        }

        let reply = self.download.lock().unwrap().clone();
        reply.to_result()
    }
}

/// Saver that keeps files in memory.
#[derive(Default)]
pub struct RecordingSaver {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingSaver {
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileSaver for RecordingSaver {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
        self.saved.lock().unwrap().push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from("/virtual").join(filename))
    }
}
