// Common data models for the acquisition pipeline

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::errors::DownloadError;

/// What the user asked for: full video or audio extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownloadMode {
    /// Audio-only stream saved as MP3
    AudioOnly,
    /// Highest-quality video muxed with the default audio track, saved as MP4
    VideoWithAudio,
}

impl DownloadMode {
    /// Extension of the final output file for this mode
    pub fn output_ext(&self) -> &'static str {
        match self {
            Self::AudioOnly => "mp3",
            Self::VideoWithAudio => "mp4",
        }
    }
}

/// A single user request. Immutable once submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    pub mode: DownloadMode,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, mode: DownloadMode) -> Self {
        Self { url: url.into(), mode }
    }

    /// Synchronous validation, before any background run starts
    pub fn validate(&self) -> Result<(), DownloadError> {
        if self.url.trim().is_empty() {
            return Err(DownloadError::InvalidRequest(
                "URL must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Track kind of a remote stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamKind {
    Video,
    Audio,
}

/// One audio or video track obtainable from the remote source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Provider-internal format ID (e.g., "137", "140")
    pub format_id: String,
    pub kind: StreamKind,
    /// Container extension (mp4, webm, m4a)
    pub ext: String,
    /// Declared size in bytes, when the provider reports one
    pub size_bytes: Option<u64>,
    /// Relative quality: resolution height for video, bitrate for audio
    pub quality_rank: u32,
    /// Direct fetch URL for this track
    pub url: String,
}

/// Media resolved from a source URL: title plus the available tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedMedia {
    pub title: String,
    pub streams: Vec<StreamDescriptor>,
}

/// Cumulative transfer state for a single stream. Ephemeral, not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferProgress {
    pub bytes_transferred: u64,
    pub bytes_total: u64,
}

impl TransferProgress {
    pub fn new(bytes_transferred: u64, bytes_total: u64) -> Self {
        Self { bytes_transferred, bytes_total }
    }

    /// Percentage in [0, 100]. A zero/unknown total reports 0 until done.
    pub fn percent(&self) -> f32 {
        if self.bytes_total == 0 {
            return 0.0;
        }
        let pct = self.bytes_transferred as f64 / self.bytes_total as f64 * 100.0;
        pct.clamp(0.0, 100.0) as f32
    }
}

/// Terminal result of a pipeline run. Produced exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineOutcome {
    Completed { final_path: PathBuf, title: String },
    Failed { message: String },
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory final files are written to; created if absent
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: dirs::download_dir()
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_rejected() {
        let req = DownloadRequest::new("  ", DownloadMode::AudioOnly);
        assert!(matches!(
            req.validate(),
            Err(DownloadError::InvalidRequest(_))
        ));
    }

    #[test]
    fn valid_request_passes() {
        let req = DownloadRequest::new(
            "https://valid.example/watch?v=abc",
            DownloadMode::VideoWithAudio,
        );
        assert!(req.validate().is_ok());
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(TransferProgress::new(0, 100).percent(), 0.0);
        assert_eq!(TransferProgress::new(50, 100).percent(), 50.0);
        assert_eq!(TransferProgress::new(100, 100).percent(), 100.0);
        // Over-delivery (chunked transfer past the declared size) stays at 100
        assert_eq!(TransferProgress::new(150, 100).percent(), 100.0);
    }

    #[test]
    fn unknown_total_reports_zero() {
        assert_eq!(TransferProgress::new(1234, 0).percent(), 0.0);
    }
}
