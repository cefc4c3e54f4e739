// ffmpeg-backed media combiner
//
// Stream-copies both tracks into one MP4 container; no re-encode.
// `+faststart` moves the moov atom up front so players can start before
// the whole file is read.

use async_trait::async_trait;
use std::path::Path;

use super::errors::DownloadError;
use super::traits::MediaCombiner;
use super::utils::{probe_binary, run_output_with_timeout};

const COMBINE_TIMEOUT_SECS: u64 = 600;

pub struct FfmpegCombiner {
    binary_path: String,
}

impl FfmpegCombiner {
    pub fn new() -> Self {
        Self {
            binary_path: "ffmpeg".to_string(),
        }
    }

    pub fn with_binary(path: impl Into<String>) -> Self {
        Self { binary_path: path.into() }
    }

    pub async fn is_available(&self) -> bool {
        probe_binary(&self.binary_path, "-version").await
    }
}

impl Default for FfmpegCombiner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaCombiner for FfmpegCombiner {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn combine(
        &self,
        video: &Path,
        audio: &Path,
        out: &Path,
    ) -> Result<(), DownloadError> {
        let args = vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            video.display().to_string(),
            "-i".to_string(),
            audio.display().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            "-movflags".to_string(),
            "+faststart".to_string(),
            out.display().to_string(),
        ];

        let output = run_output_with_timeout(&self.binary_path, args, COMBINE_TIMEOUT_SECS)
            .await
            .map_err(DownloadError::Combine)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("ffmpeg failed")
                .trim()
                .to_string();
            return Err(DownloadError::Combine(detail));
        }

        eprintln!("[ffmpeg] Muxed {} + {} -> {}", video.display(), audio.display(), out.display());
        Ok(())
    }
}
