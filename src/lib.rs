pub mod downloader;

pub use downloader::{
    AcquisitionPipeline, DownloadError, DownloadMode, DownloadRequest, EventSink,
    FfmpegCombiner, MediaCombiner, PipelineConfig, PipelineEvent, PipelineOutcome,
    RunStage, StreamProvider, TransferProgress, YtdlpProvider,
};
