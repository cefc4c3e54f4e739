// Error types for the acquisition pipeline

use std::fmt;

#[derive(Debug, Clone)]
pub enum DownloadError {
    /// Bad or unsupported URL, or no usable stream descriptor
    Resolution(String),

    /// Network or I/O failure mid-transfer
    Transfer(String),

    /// Mux/transcode failure while combining tracks
    Combine(String),

    /// Rename/delete/create failure on local disk
    Filesystem(String),

    /// Request rejected before any run started (empty URL etc.)
    InvalidRequest(String),

    /// A run is already in flight; the pipeline is single-flight
    AlreadyRunning,
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolution(msg) => write!(f, "Resolution error: {}", msg),
            Self::Transfer(msg) => write!(f, "Transfer error: {}", msg),
            Self::Combine(msg) => write!(f, "Combine error: {}", msg),
            Self::Filesystem(msg) => write!(f, "Filesystem error: {}", msg),
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Self::AlreadyRunning => write!(f, "A download is already in progress"),
        }
    }
}

impl std::error::Error for DownloadError {}

impl From<std::io::Error> for DownloadError {
    fn from(e: std::io::Error) -> Self {
        Self::Filesystem(e.to_string())
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transfer(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_detail() {
        let e = DownloadError::Resolution("private video".to_string());
        assert!(e.to_string().contains("private video"));
    }

    #[test]
    fn io_errors_map_to_filesystem() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        match DownloadError::from(io) {
            DownloadError::Filesystem(msg) => assert!(msg.contains("denied")),
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}
