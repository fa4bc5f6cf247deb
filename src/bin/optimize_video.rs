//! Produce web-optimized MP4 and WebM encodings of the story video.
//!
//! Run: `cargo run --bin optimize-video -- story-video.mp4` (needs ffmpeg on PATH)

use std::path::PathBuf;
use std::process::ExitCode;

use bon_voyage::assets::video::{self, DEFAULT_VIDEO, VideoPlan};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Transcode a video in the assets directory to MP4 (H.264) and WebM (VP9)")]
struct Args {
    /// Video file name inside the assets directory.
    #[arg(default_value = DEFAULT_VIDEO)]
    file: String,
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// ffmpeg executable to invoke.
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();
    let plan = VideoPlan::new(&args.assets, &args.file);
    tracing::info!("optimizing {}", plan.input.display());
    match video::optimize(&plan, &args.ffmpeg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
