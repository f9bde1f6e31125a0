//! CLI logic for the Scenecast tool.
//!
//! Reads a transcript, turns it into scenes and writes them as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use scenecast::{ScenecastError, pipeline::Pipeline, semantic::TranscriptSegment};

/// Run the Scenecast CLI application
///
/// This function processes the input transcript through the Scenecast
/// pipeline and writes the resulting scenes to the output file. When the job
/// stops part way, the scenes finished before the failure are still written.
///
/// # Errors
///
/// Returns `ScenecastError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed or invalid transcripts
/// - Scenes that cannot be laid out
pub fn run(args: &Args) -> Result<(), ScenecastError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing transcript"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let transcript: Vec<TranscriptSegment> = serde_json::from_str(&source)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(app_config.pipeline().workers)
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        let (sender, mut receiver) = mpsc::unbounded_channel::<scenecast::pipeline::ProgressEvent>();
        let progress = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                debug!(
                    stage:% = event.stage,
                    scene = event.scene_index,
                    percent = event.percent;
                    "Progress"
                );
            }
        });

        let pipeline = Pipeline::new(app_config).with_progress(sender);
        let result = pipeline.run(&transcript, CancellationToken::new()).await;
        // Dropping the pipeline closes the channel
        drop(pipeline);
        let _ = progress.await;
        result
    });

    let scenes = match result {
        Ok(scenes) => scenes,
        Err(err) => {
            if !err.partial().is_empty() {
                warn!(scenes = err.partial().len(); "Writing partial result");
                write_scenes(&args.output, err.partial())?;
            }
            return Err(err);
        }
    };

    write_scenes(&args.output, &scenes)?;
    info!(output_file = args.output, scenes = scenes.len(); "Scenes exported successfully");

    Ok(())
}

fn write_scenes(path: &str, scenes: &[scenecast::semantic::Scene]) -> Result<(), ScenecastError> {
    let json = serde_json::to_string_pretty(scenes)?;
    fs::write(path, json)?;
    Ok(())
}
