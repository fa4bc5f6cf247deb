//! Offline asset optimizers run before deploying the page.
//!
//! Both operate on an `assets/` directory with an `archive/` sibling layout:
//! derived files are written next to their sources and originals are moved
//! into the archive so the page only references the optimized versions.

use std::path::{Path, PathBuf};

pub mod images;
pub mod video;

pub const ARCHIVE_DIR: &str = "archive";
pub const ORIGINALS_DIR: &str = "originals";

pub fn archive_dir(assets: &Path) -> PathBuf {
    assets.join(ARCHIVE_DIR)
}

pub fn originals_dir(assets: &Path) -> PathBuf {
    archive_dir(assets).join(ORIGINALS_DIR)
}

/// File stem without the last extension, lossily decoded.
pub(crate) fn base_name(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}
