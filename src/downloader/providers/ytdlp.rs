// yt-dlp backed stream provider
//
// Resolution is delegated to `yt-dlp --dump-json`: one subprocess call per
// source URL, parsed into a title plus per-track descriptors. Fetching does
// not shell out again; each descriptor carries a direct CDN URL which we
// stream to disk ourselves so byte-level progress stays in our hands.

use async_trait::async_trait;
use futures::StreamExt;
use std::path::Path;
use std::process::Command as StdCommand;
use tokio::io::AsyncWriteExt;

use crate::downloader::errors::DownloadError;
use crate::downloader::models::{ResolvedMedia, StreamDescriptor, StreamKind};
use crate::downloader::traits::{ChunkCallback, StreamProvider};
use crate::downloader::utils::{probe_binary, run_output_with_timeout};

const RESOLVE_TIMEOUT_SECS: u64 = 30;

pub struct YtdlpProvider {
    binary_path: String,
    client: reqwest::Client,
}

impl YtdlpProvider {
    pub fn new() -> Self {
        Self {
            binary_path: find_ytdlp(),
            client: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Whether the yt-dlp binary responds at all
    pub async fn is_available(&self) -> bool {
        probe_binary(&self.binary_path, "--version").await
    }
}

impl Default for YtdlpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StreamProvider for YtdlpProvider {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn resolve(&self, url: &str) -> Result<ResolvedMedia, DownloadError> {
        let args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            "15".to_string(),
            "--retries".to_string(),
            "2".to_string(),
            url.to_string(),
        ];

        let output = run_output_with_timeout(&self.binary_path, args, RESOLVE_TIMEOUT_SECS)
            .await
            .map_err(DownloadError::Resolution)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DownloadError::Resolution(summarize_stderr(&stderr)));
        }

        parse_resolved_media(&output.stdout)
    }

    async fn fetch(
        &self,
        descriptor: &StreamDescriptor,
        dest: &Path,
        on_chunk: ChunkCallback<'_>,
    ) -> Result<(), DownloadError> {
        let response = self
            .client
            .get(&descriptor.url)
            .send()
            .await?
            .error_for_status()?;

        // Prefer the server's content-length; the resolver's figure can be
        // approximate for DASH tracks.
        let total = response
            .content_length()
            .or(descriptor.size_bytes)
            .unwrap_or(0);

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut delivered: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            delivered += chunk.len() as u64;
            on_chunk(delivered, total);
        }

        file.flush().await?;
        eprintln!(
            "[yt-dlp] Fetched format {} ({} bytes) to {}",
            descriptor.format_id,
            delivered,
            dest.display()
        );
        Ok(())
    }
}

/// Parse `yt-dlp --dump-json` output into a title plus track descriptors.
/// Combined (audio+video) formats and manifest-only formats without a
/// direct URL are skipped; the pipeline muxes the tracks itself.
pub fn parse_resolved_media(stdout: &[u8]) -> Result<ResolvedMedia, DownloadError> {
    let json_str = String::from_utf8_lossy(stdout);
    let json: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| DownloadError::Resolution(format!("Failed to parse JSON: {}", e)))?;

    let title = json["title"].as_str().unwrap_or("Unknown").to_string();

    let mut streams = Vec::new();
    if let Some(formats) = json["formats"].as_array() {
        for f in formats {
            let url = match f["url"].as_str() {
                Some(u) if !u.is_empty() => u.to_string(),
                _ => continue,
            };

            let has_video = f["vcodec"].as_str().map_or(false, |v| v != "none");
            let has_audio = f["acodec"].as_str().map_or(false, |a| a != "none");

            let kind = match (has_video, has_audio) {
                (true, false) => StreamKind::Video,
                (false, true) => StreamKind::Audio,
                // Combined or codec-less entries are not usable tracks
                _ => continue,
            };

            let size_bytes = f["filesize"]
                .as_u64()
                .or_else(|| f["filesize_approx"].as_u64());

            let quality_rank = match kind {
                StreamKind::Video => f["height"].as_u64().unwrap_or(0) as u32,
                StreamKind::Audio => f["abr"].as_f64().unwrap_or(0.0) as u32,
            };

            streams.push(StreamDescriptor {
                format_id: f["format_id"].as_str().unwrap_or("").to_string(),
                kind,
                ext: f["ext"].as_str().unwrap_or("").to_string(),
                size_bytes,
                quality_rank,
                url,
            });
        }
    }

    if streams.is_empty() {
        return Err(DownloadError::Resolution(
            "no downloadable streams found".to_string(),
        ));
    }

    Ok(ResolvedMedia { title, streams })
}

/// First ERROR line of yt-dlp stderr, or a trailing non-empty line
fn summarize_stderr(stderr: &str) -> String {
    stderr
        .lines()
        .find(|l| l.trim_start().starts_with("ERROR:"))
        .or_else(|| stderr.lines().rev().find(|l| !l.trim().is_empty()))
        .unwrap_or("yt-dlp failed")
        .trim()
        .to_string()
}

// Find yt-dlp in common install locations before falling back to PATH
fn find_ytdlp() -> String {
    let common_paths = [
        "/opt/homebrew/bin/yt-dlp",
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
    ];

    for path in common_paths {
        if std::path::Path::new(path).exists() {
            return path.to_string();
        }
    }

    if let Ok(output) = StdCommand::new("which").arg("yt-dlp").output() {
        if output.status.success() {
            if let Ok(path) = String::from_utf8(output.stdout) {
                let trimmed = path.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_string();
                }
            }
        }
    }

    "yt-dlp".to_string()
}
