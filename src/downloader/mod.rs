// Downloader module - acquisition pipeline and its collaborator seams

pub mod combiner;
pub mod errors;
pub mod events;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod sanitize;
pub mod selection;
pub mod traits;
pub mod utils;

pub use combiner::FfmpegCombiner;
pub use errors::DownloadError;
pub use events::{EventSink, PipelineEvent, RunStage};
pub use models::{
    DownloadMode, DownloadRequest, PipelineConfig, PipelineOutcome, ResolvedMedia,
    StreamDescriptor, StreamKind, TransferProgress,
};
pub use pipeline::AcquisitionPipeline;
pub use providers::YtdlpProvider;
pub use sanitize::sanitize_title;
pub use traits::{MediaCombiner, StreamProvider};
