//! What the user sees: the view model the controller mutates and front-ends render.

use crate::core::config;
use crate::core::utils::{format_duration, format_file_size, format_view_count, UNKNOWN_SIZE};
use crate::download::models::{FormatKind, FormatOption, VideoMetadata};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Info,
}

/// Auto-dismissing message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub text: String,
}

/// One entry of the quality selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityOption {
    /// Quality label sent to the backend
    pub value: String,
    /// Display text, e.g. "720p (MP4) - 50.00 MB"
    pub label: String,
}

impl QualityOption {
    pub fn from_format(format: &FormatOption) -> Self {
        let mut label = format!("{} ({})", format.quality, format.ext.to_uppercase());
        if let Some(size) = format.known_size() {
            label.push_str(" - ");
            label.push_str(&format_file_size(Some(size)));
        }
        Self {
            value: format.quality.clone(),
            label,
        }
    }

    /// Placeholder used when the backend reported no formats.
    pub fn fallback() -> Self {
        Self {
            value: config::quality::FALLBACK_QUALITY.to_string(),
            label: config::quality::FALLBACK_LABEL.to_string(),
        }
    }

    /// One option per format in backend order, or the single fallback.
    pub fn list_for(metadata: &VideoMetadata) -> Vec<Self> {
        if metadata.formats.is_empty() {
            vec![Self::fallback()]
        } else {
            metadata.formats.iter().map(Self::from_format).collect()
        }
    }
}

/// Formatted video details panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataPanel {
    pub title: String,
    pub channel: String,
    pub duration: String,
    pub views: String,
    pub thumbnail: String,
}

impl From<&VideoMetadata> for MetadataPanel {
    fn from(metadata: &VideoMetadata) -> Self {
        Self {
            title: metadata.title.clone(),
            channel: metadata.channel.clone(),
            duration: format_duration(metadata.duration),
            views: format_view_count(metadata.view_count),
            thumbnail: metadata.thumbnail.clone(),
        }
    }
}

/// Everything a front-end needs to render the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub fetch_enabled: bool,
    pub loading_visible: bool,
    /// `None` while the details panel is hidden
    pub panel: Option<MetadataPanel>,
    pub quality_options: Vec<QualityOption>,
    pub selected_kind: FormatKind,
    pub selected_quality: Option<String>,
    pub quality_selector_visible: bool,
    pub estimated_size: String,
    pub progress_visible: bool,
    pub progress_text: String,
    pub cancel_visible: bool,
    pub download_enabled: bool,
    pub notices: Vec<Notice>,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self {
            fetch_enabled: true,
            loading_visible: false,
            panel: None,
            quality_options: Vec::new(),
            selected_kind: FormatKind::Video,
            selected_quality: None,
            quality_selector_visible: true,
            estimated_size: UNKNOWN_SIZE.to_string(),
            progress_visible: false,
            progress_text: String::new(),
            cancel_visible: false,
            download_enabled: true,
            notices: Vec::new(),
        }
    }
}

impl ViewModel {
    /// Error notices currently on screen.
    pub fn errors(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(|n| n.level == NoticeLevel::Error)
    }

    /// Label of the selected quality option, if any.
    pub fn selected_label(&self) -> Option<&str> {
        let selected = self.selected_quality.as_deref()?;
        self.quality_options
            .iter()
            .find(|o| o.value == selected)
            .map(|o| o.label.as_str())
    }
}
