//! HttpBackend talks to the download server over HTTP.
//!
//! - `POST /api/video-info` with `{"url"}` → metadata JSON
//! - `POST /api/download` with `{"url","format","quality"}` → file body
//! - Any non-success status carries `{"error": "..."}`
//! - Download bodies are streamed chunk by chunk so cancellation and progress work
//!   while the transfer is running

use crate::core::config::{self, ClientConfig};
use crate::core::error::AppError;
use crate::download::backend::{Backend, TransferProgress};
use crate::download::filename::parse_content_disposition;
use crate::download::models::{DownloadPayload, DownloadRequest, InfoRequest, VideoMetadata};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use reqwest::{header, Client, Response};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

const INFO_PATH: &str = "api/video-info";
const DOWNLOAD_PATH: &str = "api/download";

/// Error body the backend sends with non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Backend reached over HTTP.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Builds a backend for `base_url` with the request deadline from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(concat!("tubefetch/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .connect_timeout(config::network::connect_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(&config.backend_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        Ok(self.base_url.join(path)?)
    }

    /// Turn a non-success response into `AppError::Backend`, keeping the server message.
    async fn error_from_response(response: Response) -> AppError {
        let status = response.status();
        let message = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.trim().is_empty()),
            Err(e) => {
                log::debug!("Failed to read error body: {}", e);
                None
            }
        };
        AppError::Backend { status, message }
    }

    /// Stream the body into memory, honoring cancellation between chunks.
    async fn read_body(
        response: Response,
        cancel: &CancellationToken,
        progress_tx: &mpsc::UnboundedSender<TransferProgress>,
    ) -> Result<BytesMut, AppError> {
        let total = response.content_length();
        read_chunks(Box::pin(response.bytes_stream()), total, cancel, progress_tx).await
    }
}

/// Collect body chunks, reporting progress after each one and stopping as soon as
/// `cancel` fires.
async fn read_chunks<S>(
    mut stream: S,
    total: Option<u64>,
    cancel: &CancellationToken,
    progress_tx: &mpsc::UnboundedSender<TransferProgress>,
) -> Result<BytesMut, AppError>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Unpin,
{
    let mut body = BytesMut::with_capacity(total.unwrap_or(0).min(64 * 1024 * 1024) as usize);

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
            next = stream.next() => next,
        };
        let Some(chunk) = chunk else { break };
        let chunk = chunk?;
        body.extend_from_slice(&chunk);

        let _ = progress_tx.send(TransferProgress {
            received: body.len() as u64,
            total,
        });
    }

    Ok(body)
}

/// Base URLs are joined with relative paths, so they must end with '/'.
fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl Backend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_info(&self, url: &str) -> Result<VideoMetadata, AppError> {
        let endpoint = self.endpoint(INFO_PATH)?;
        log::debug!("Requesting video info from {} for {}", endpoint, url);

        let response = self.client.post(endpoint).json(&InfoRequest { url }).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response.bytes().await?;
        let metadata: VideoMetadata = serde_json::from_slice(&body)?;
        log::info!(
            "Video info received: {} ({} formats)",
            metadata.title,
            metadata.formats.len()
        );
        Ok(metadata)
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        cancel: CancellationToken,
        progress_tx: mpsc::UnboundedSender<TransferProgress>,
    ) -> Result<DownloadPayload, AppError> {
        let endpoint = self.endpoint(DOWNLOAD_PATH)?;
        log::info!(
            "📥 Requesting download: {} (format: {}, quality: {})",
            request.url,
            request.format,
            request.quality
        );

        // The backend converts the whole file before answering, so the wait for
        // headers is the long part and must be cancellable too.
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
            response = self.client.post(endpoint).json(request).send() => response?,
        };

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let filename = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_disposition);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = Self::read_body(response, &cancel, &progress_tx).await?;

        log::info!(
            "✅ Download body received ({:.2} MB, filename hint: {:?})",
            body.len() as f64 / (1024.0 * 1024.0),
            filename
        );

        Ok(DownloadPayload {
            bytes: body.freeze(),
            filename,
            content_type,
        })
    }
}
