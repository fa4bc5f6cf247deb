//! Convert the page's JPG/PNG assets to WebP and archive the originals.
//!
//! Run: `cargo run --bin optimize-images -- --assets assets`

use std::path::PathBuf;
use std::process::ExitCode;

use bon_voyage::assets::images::{self, ImageOptions};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Create WebP versions of assets/*.jpg|png and archive the originals")]
struct Args {
    /// Assets directory holding the page images.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Images wider than this are scaled down, keeping aspect ratio.
    #[arg(long, default_value_t = 1200)]
    max_width: u32,
    /// WebP quality (0-100).
    #[arg(long, default_value_t = 82.0)]
    quality: f32,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();
    let opts = ImageOptions { max_width: args.max_width, quality: args.quality.clamp(0.0, 100.0) };
    match images::optimize_dir(&args.assets, &opts) {
        Ok(report) => {
            tracing::info!(
                converted = report.converted.len(),
                failed = report.failed.len(),
                "done; pages should reference the WebP files with archived fallbacks"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
