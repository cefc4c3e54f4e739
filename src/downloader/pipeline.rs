// Acquisition pipeline: resolve, transfer, combine, finalize, clean up
//
// One run per request: resolve stream descriptors, transfer the selected
// tracks sequentially into a per-run scratch directory, mux when the mode
// needs it, move the result to its sanitized final name, and purge the
// scratch directory. Every error is converted to a `Failed` outcome at the
// boundary; nothing below this layer escapes to the host.
//
// Runs are single-flight: an atomic lock rejects a second `run` while one
// is in flight, and scratch paths are unique per run so even a bypassed
// lock could not cross artifacts.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::errors::DownloadError;
use super::events::{EventSink, PipelineEvent, RunStage};
use super::models::{
    DownloadMode, DownloadRequest, PipelineConfig, PipelineOutcome, StreamDescriptor,
    TransferProgress,
};
use super::sanitize::sanitize_title;
use super::selection::{select_best_video, select_default_audio};
use super::traits::{MediaCombiner, StreamProvider};

pub struct AcquisitionPipeline {
    provider: Arc<dyn StreamProvider>,
    combiner: Arc<dyn MediaCombiner>,
    config: PipelineConfig,
    running: AtomicBool,
    run_seq: AtomicU64,
}

/// Releases the single-flight lock when a run ends, on every path
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AcquisitionPipeline {
    pub fn new(
        provider: Arc<dyn StreamProvider>,
        combiner: Arc<dyn MediaCombiner>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            provider,
            combiner,
            config,
            running: AtomicBool::new(false),
            run_seq: AtomicU64::new(0),
        }
    }

    /// Whether a run is currently in flight
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Execute one run to its terminal outcome. Emits progress and stage
    /// events on `events` while in flight and always finishes with a single
    /// `Finished` event carrying the same outcome that is returned.
    pub async fn run(&self, request: DownloadRequest, events: EventSink) -> PipelineOutcome {
        let outcome = match self.try_start(&request) {
            Ok(_guard) => match self.run_inner(&request, &events).await {
                Ok((final_path, title)) => PipelineOutcome::Completed { final_path, title },
                Err(e) => {
                    eprintln!("[pipeline] Run failed: {}", e);
                    PipelineOutcome::Failed { message: e.to_string() }
                }
            },
            Err(e) => PipelineOutcome::Failed { message: e.to_string() },
        };

        events.emit(PipelineEvent::Finished(outcome.clone()));
        outcome
    }

    /// Validate the request and acquire the single-flight lock
    fn try_start(&self, request: &DownloadRequest) -> Result<RunGuard<'_>, DownloadError> {
        request.validate()?;
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DownloadError::AlreadyRunning)?;
        Ok(RunGuard(&self.running))
    }

    async fn run_inner(
        &self,
        request: &DownloadRequest,
        events: &EventSink,
    ) -> Result<(PathBuf, String), DownloadError> {
        tokio::fs::create_dir_all(&self.config.output_dir).await?;
        let scratch = self.create_scratch_dir().await?;

        let result = self.acquire(request, events, &scratch).await;

        // Purge temporaries unconditionally, success or failure
        if let Err(e) = tokio::fs::remove_dir_all(&scratch).await {
            eprintln!("[pipeline] Failed to purge scratch dir {}: {}", scratch.display(), e);
        }

        result
    }

    async fn acquire(
        &self,
        request: &DownloadRequest,
        events: &EventSink,
        scratch: &PathBuf,
    ) -> Result<(PathBuf, String), DownloadError> {
        events.stage(RunStage::Resolving);
        eprintln!("[pipeline] Resolving via {}: {}", self.provider.name(), request.url);
        let media = self.provider.resolve(&request.url).await?;
        let title = media.title.clone();

        let final_path = self
            .config
            .output_dir
            .join(format!("{}.{}", sanitize_title(&title), request.mode.output_ext()));

        match request.mode {
            DownloadMode::VideoWithAudio => {
                let video = select_best_video(&media.streams, "mp4")?;
                let audio = select_default_audio(&media.streams)?;

                let video_path = scratch.join(temp_name("video", &video.ext));
                let audio_path = scratch.join(temp_name("audio", &audio.ext));

                events.stage(RunStage::DownloadingVideo);
                self.transfer(video, &video_path, events).await?;

                events.stage(RunStage::DownloadingAudio);
                self.transfer(audio, &audio_path, events).await?;

                events.stage(RunStage::Combining);
                let combined_path = scratch.join("combined.mp4");
                self.combiner
                    .combine(&video_path, &audio_path, &combined_path)
                    .await?;

                events.stage(RunStage::Finalizing);
                tokio::fs::rename(&combined_path, &final_path).await?;
            }
            DownloadMode::AudioOnly => {
                let audio = select_default_audio(&media.streams)?;
                let audio_path = scratch.join(temp_name("audio", &audio.ext));

                events.stage(RunStage::DownloadingAudio);
                self.transfer(audio, &audio_path, events).await?;

                events.stage(RunStage::Finalizing);
                tokio::fs::rename(&audio_path, &final_path).await?;
            }
        }

        eprintln!("[pipeline] Completed: {}", final_path.display());
        Ok((final_path, title))
    }

    /// Transfer one stream, forwarding byte counts as progress events
    async fn transfer(
        &self,
        descriptor: &StreamDescriptor,
        dest: &PathBuf,
        events: &EventSink,
    ) -> Result<(), DownloadError> {
        let delivered = AtomicU64::new(0);
        let sink = events.clone();

        let on_chunk = |transferred: u64, total: u64| {
            delivered.store(transferred, Ordering::Relaxed);
            sink.progress(TransferProgress::new(transferred, total));
        };

        self.provider.fetch(descriptor, dest, &on_chunk).await?;

        // Declared sizes can be approximate; pin the bar to 100 once the
        // stream has ended.
        let total = delivered.load(Ordering::Relaxed).max(1);
        events.progress(TransferProgress::new(total, total));
        Ok(())
    }

    /// Per-run-unique scratch directory under the output directory, so
    /// temporaries can never collide with a final file or another run
    async fn create_scratch_dir(&self) -> Result<PathBuf, DownloadError> {
        let stamp = time::OffsetDateTime::now_utc().unix_timestamp();
        let seq = self.run_seq.fetch_add(1, Ordering::Relaxed);
        let scratch = self
            .config
            .output_dir
            .join(format!(".clipfetch-{}-{}", stamp, seq));
        tokio::fs::create_dir_all(&scratch).await?;
        Ok(scratch)
    }
}

fn temp_name(base: &str, ext: &str) -> String {
    if ext.is_empty() {
        base.to_string()
    } else {
        format!("{}.{}", base, ext)
    }
}
