// Seams to the external collaborators: stream provider and media combiner

use async_trait::async_trait;
use std::path::Path;

use super::errors::DownloadError;
use super::models::{ResolvedMedia, StreamDescriptor};

/// Chunk callback invoked as bytes arrive: (bytes delivered so far, declared total).
/// Called synchronously from the transfer loop; must be cheap and must not
/// assume it runs on any particular thread.
pub type ChunkCallback<'a> = &'a (dyn Fn(u64, u64) + Send + Sync);

/// Resolves and fetches remote streams for a source URL
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Name of the provider (for logging)
    fn name(&self) -> &'static str;

    /// Resolve the media title and available stream descriptors
    async fn resolve(&self, url: &str) -> Result<ResolvedMedia, DownloadError>;

    /// Fetch one stream's bytes to `dest`, reporting progress via `on_chunk`
    async fn fetch(
        &self,
        descriptor: &StreamDescriptor,
        dest: &Path,
        on_chunk: ChunkCallback<'_>,
    ) -> Result<(), DownloadError>;
}

/// Muxes a video-only file and an audio-only file into one container
#[async_trait]
pub trait MediaCombiner: Send + Sync {
    /// Name of the combiner (for logging)
    fn name(&self) -> &'static str;

    async fn combine(
        &self,
        video: &Path,
        audio: &Path,
        out: &Path,
    ) -> Result<(), DownloadError>;
}
