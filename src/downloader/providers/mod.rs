pub mod ytdlp;

pub use ytdlp::YtdlpProvider;
