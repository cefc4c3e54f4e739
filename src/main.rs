// Terminal host: collects a request, runs the pipeline on a background
// task, and renders progress/spinner state from the event channel.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clipfetch::{
    AcquisitionPipeline, DownloadMode, DownloadRequest, EventSink, FfmpegCombiner,
    PipelineConfig, PipelineEvent, PipelineOutcome, YtdlpProvider,
};

const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];
const SPINNER_TICK_MS: u64 = 200;

#[tokio::main]
async fn main() {
    let provider = Arc::new(YtdlpProvider::new());
    let combiner = Arc::new(FfmpegCombiner::new());

    if !provider.is_available().await {
        eprintln!("yt-dlp not found. Install it and make sure it is on PATH.");
        std::process::exit(1);
    }
    if !combiner.is_available().await {
        eprintln!("ffmpeg not found. Install it and make sure it is on PATH.");
        std::process::exit(1);
    }

    let config = PipelineConfig::default();
    println!("Saving downloads to {}", config.output_dir.display());
    let pipeline = Arc::new(AcquisitionPipeline::new(provider, combiner, config));

    loop {
        let Some(url) = prompt("URL (empty to quit): ") else { break };
        if url.is_empty() {
            break;
        }

        let mode = match prompt("Format - [1] MP4 video, [2] MP3 audio: ").as_deref() {
            Some("1") => DownloadMode::VideoWithAudio,
            Some("2") => DownloadMode::AudioOnly,
            _ => {
                println!("Error: pick 1 or 2.");
                continue;
            }
        };

        let request = DownloadRequest::new(url, mode);
        // Validation surfaces before anything starts in the background
        if let Err(e) = request.validate() {
            println!("Error: {}", e);
            continue;
        }

        run_and_render(&pipeline, request).await;
    }
}

/// Run one request to completion, rendering events as they arrive and
/// cycling the spinner on a fixed tick while the run is in flight.
async fn run_and_render(pipeline: &Arc<AcquisitionPipeline>, request: DownloadRequest) {
    let (sink, mut rx) = EventSink::channel();
    let run = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.run(request, sink).await }
    });

    let mut ticker = tokio::time::interval(Duration::from_millis(SPINNER_TICK_MS));
    let mut frame = 0usize;
    let mut stage_label = "Starting";
    let mut percent = 0.0f32;

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(PipelineEvent::Stage(stage)) => {
                    stage_label = stage.label();
                    percent = 0.0;
                    draw_status(stage_label, SPINNER_FRAMES[frame], percent);
                }
                Some(PipelineEvent::Progress(p)) => {
                    percent = p.percent();
                    draw_status(stage_label, SPINNER_FRAMES[frame], percent);
                }
                Some(PipelineEvent::Finished(outcome)) => {
                    print!("\r{:<60}\r", "");
                    match outcome {
                        PipelineOutcome::Completed { final_path, .. } => {
                            println!("Success: saved {}", final_path.display());
                        }
                        PipelineOutcome::Failed { message } => {
                            println!("Error: {}", message);
                        }
                    }
                    break;
                }
                // Sender dropped without a terminal event: run task died
                None => {
                    println!("\rError: download task ended unexpectedly");
                    break;
                }
            },
            _ = ticker.tick() => {
                frame = (frame + 1) % SPINNER_FRAMES.len();
                draw_status(stage_label, SPINNER_FRAMES[frame], percent);
            }
        }
    }

    let _ = run.await;
}

fn draw_status(stage: &str, spinner: char, percent: f32) {
    print!("\r{} {} {:>5.1}%  ", spinner, stage, percent);
    let _ = std::io::stdout().flush();
}

fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    match std::io::stdin().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}
