//! JPG/PNG -> lossy WebP conversion with width capping and archiving.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use image::DynamicImage;
use image::imageops::FilterType;
use tracing::{error, info};

use super::{archive_dir, base_name, originals_dir};

/// Name of the fallback image kept in the archive and mirrored into assets.
pub const FALLBACK_PNG: &str = "fallback.png";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageOptions {
    pub max_width: u32,
    /// libwebp quality factor, 0-100.
    pub quality: f32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self { max_width: 1200, quality: 82.0 }
    }
}

#[derive(Debug, Default)]
pub struct ImageReport {
    /// Source file names converted and archived.
    pub converted: Vec<String>,
    /// Source file name and the error that stopped it.
    pub failed: Vec<(String, String)>,
    pub fallback: Option<Result<(), String>>,
}

/// Whether a file in the assets directory should be converted.
pub fn is_candidate(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    let raster = [".jpg", ".jpeg", ".png"].iter().any(|ext| lower.ends_with(ext));
    raster && !lower.contains("favicon") && !lower.starts_with("fallback.")
}

/// Decode `input`, shrink to `max_width` if wider, and write a WebP to `output`.
/// Returns the written dimensions.
pub fn convert_to_webp(input: &Path, output: &Path, opts: &ImageOptions) -> Result<(u32, u32)> {
    let img = image::open(input).with_context(|| format!("decoding {}", input.display()))?;
    let img = if img.width() > opts.max_width {
        img.resize(opts.max_width, u32::MAX, FilterType::Lanczos3)
    } else {
        img
    };
    // libwebp only takes 8-bit RGB(A).
    let img = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };
    let encoder = webp::Encoder::from_image(&img).map_err(|e| anyhow!("webp encoder: {e}"))?;
    let encoded = encoder.encode(opts.quality);
    fs::write(output, &*encoded).with_context(|| format!("writing {}", output.display()))?;
    Ok((img.width(), img.height()))
}

fn webp_path(assets: &Path, source: &Path) -> PathBuf {
    assets.join(format!("{}.webp", base_name(source)))
}

/// Convert every candidate image in `assets` and move the originals into
/// `archive/originals/`. One file failing never stops the batch; only an
/// unusable assets directory is an error.
pub fn optimize_dir(assets: &Path, opts: &ImageOptions) -> Result<ImageReport> {
    if !assets.is_dir() {
        bail!("assets directory not found: {}", assets.display());
    }
    let originals = originals_dir(assets);
    fs::create_dir_all(&originals).with_context(|| format!("creating {}", originals.display()))?;

    let mut report = ImageReport::default();

    let fallback_src = archive_dir(assets).join(FALLBACK_PNG);
    if fallback_src.is_file() {
        let result = convert_to_webp(&fallback_src, &webp_path(assets, &fallback_src), opts)
            .and_then(|_| {
                fs::copy(&fallback_src, assets.join(FALLBACK_PNG))
                    .map(|_| ())
                    .context("copying fallback.png")
            });
        match &result {
            Ok(()) => info!("{FALLBACK_PNG} -> fallback.webp (from archive)"),
            Err(e) => error!("{FALLBACK_PNG}: {e:#}"),
        }
        report.fallback = Some(result.map_err(|e| format!("{e:#}")));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(assets)
        .with_context(|| format!("listing {}", assets.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| p.file_name().and_then(|n| n.to_str()).is_some_and(is_candidate))
        .collect();
    files.sort();
    info!("converting {} images to WebP", files.len());

    for path in files {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let output = webp_path(assets, &path);
        let result = convert_to_webp(&path, &output, opts).and_then(|(w, h)| {
            fs::rename(&path, originals.join(&name)).context("archiving original")?;
            Ok((w, h))
        });
        match result {
            Ok((w, h)) => {
                info!("{name} -> {} ({w}x{h}), original archived", output.display());
                report.converted.push(name);
            }
            Err(e) => {
                error!("{name}: {e:#}");
                report.failed.push((name, format!("{e:#}")));
            }
        }
    }
    Ok(report)
}
