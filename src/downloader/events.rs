// Event channel between the pipeline (producer) and the host (consumer)

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::models::{PipelineOutcome, TransferProgress};

/// Coarse phase of a run, for status display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStage {
    Resolving,
    DownloadingVideo,
    DownloadingAudio,
    Combining,
    Finalizing,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Resolving => "Resolving streams",
            Self::DownloadingVideo => "Downloading video",
            Self::DownloadingAudio => "Downloading audio",
            Self::Combining => "Merging video and audio",
            Self::Finalizing => "Finalizing",
        }
    }
}

/// Events a run emits while in flight. `Finished` is sent exactly once,
/// last, and replaces any liveness polling on the host side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    Stage(RunStage),
    Progress(TransferProgress),
    Finished(PipelineOutcome),
}

/// Sending half handed to the pipeline. Never blocks; a disconnected
/// receiver is ignored so a run can finish even if the host went away.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<PipelineEvent>,
}

impl EventSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: PipelineEvent) {
        let _ = self.tx.send(event);
    }

    pub fn stage(&self, stage: RunStage) {
        self.emit(PipelineEvent::Stage(stage));
    }

    pub fn progress(&self, progress: TransferProgress) {
        self.emit(PipelineEvent::Progress(progress));
    }
}
