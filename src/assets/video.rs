//! MP4 (H.264) + WebM (VP9) transcoding through an external `ffmpeg`.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use tracing::info;

use super::{archive_dir, base_name};

pub const DEFAULT_VIDEO: &str = "story-video.mp4";

/// Every path the optimizer reads or writes for one source video.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoPlan {
    pub input: PathBuf,
    pub optimized_mp4: PathBuf,
    pub webm: PathBuf,
    pub archived_original: PathBuf,
}

impl VideoPlan {
    pub fn new(assets: &Path, file: &str) -> Self {
        let input = assets.join(file);
        let base = base_name(&input);
        Self {
            optimized_mp4: assets.join(format!("{base}_optimized.mp4")),
            webm: assets.join(format!("{base}.webm")),
            archived_original: archive_dir(assets).join(format!("{base}_original.mp4")),
            input,
        }
    }

    /// H.264 CRF 28 with AAC audio and the moov atom up front for streaming.
    pub fn mp4_args(&self) -> Vec<OsString> {
        let mut args = vec![OsString::from("-i"), self.input.clone().into()];
        args.extend(
            [
                "-c:v", "libx264", "-crf", "28", "-preset", "medium", "-c:a", "aac", "-b:a", "96k",
                "-movflags", "+faststart", "-y",
            ]
            .map(OsString::from),
        );
        args.push(self.optimized_mp4.clone().into());
        args
    }

    /// VP9 constant quality with Opus audio.
    pub fn webm_args(&self) -> Vec<OsString> {
        let mut args = vec![OsString::from("-i"), self.input.clone().into()];
        args.extend(
            ["-c:v", "libvpx-vp9", "-crf", "35", "-b:v", "0", "-c:a", "libopus", "-b:a", "96k", "-y"]
                .map(OsString::from),
        );
        args.push(self.webm.clone().into());
        args
    }
}

/// True when `ffmpeg -version` runs successfully.
pub fn ffmpeg_available(ffmpeg: &Path) -> bool {
    Command::new(ffmpeg)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

fn transcode(ffmpeg: &Path, args: &[OsString]) -> Result<()> {
    let status = Command::new(ffmpeg)
        .args(args)
        .status()
        .with_context(|| format!("spawning {}", ffmpeg.display()))?;
    if !status.success() {
        bail!("{} exited with {status}", ffmpeg.display());
    }
    Ok(())
}

/// Check prerequisites before any work: the input exists and ffmpeg runs.
pub fn preflight(plan: &VideoPlan, ffmpeg: &Path) -> Result<()> {
    if !plan.input.is_file() {
        bail!("video not found: {}", plan.input.display());
    }
    if !ffmpeg_available(ffmpeg) {
        bail!("{} not found on PATH", ffmpeg.display());
    }
    Ok(())
}

/// Transcode both formats, then archive the original and put the optimized
/// MP4 in its place.
pub fn optimize(plan: &VideoPlan, ffmpeg: &Path) -> Result<()> {
    preflight(plan, ffmpeg)?;

    info!("creating optimized MP4");
    transcode(ffmpeg, &plan.mp4_args())?;
    info!("creating WebM");
    transcode(ffmpeg, &plan.webm_args())?;

    if let Some(dir) = plan.archived_original.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::rename(&plan.input, &plan.archived_original).context("archiving original")?;
    fs::rename(&plan.optimized_mp4, &plan.input).context("replacing original")?;
    info!("original saved to {}", plan.archived_original.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_paths_follow_base_name() {
        let plan = VideoPlan::new(Path::new("assets"), "clip.mov");
        assert_eq!(plan.input, Path::new("assets/clip.mov"));
        assert_eq!(plan.optimized_mp4, Path::new("assets/clip_optimized.mp4"));
        assert_eq!(plan.webm, Path::new("assets/clip.webm"));
        assert_eq!(plan.archived_original, Path::new("assets/archive/clip_original.mp4"));
    }

    #[test]
    fn encoder_arguments() {
        let plan = VideoPlan::new(Path::new("a"), DEFAULT_VIDEO);
        let mp4: Vec<String> = plan.mp4_args().iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(mp4.first().map(String::as_str), Some("-i"));
        assert!(mp4.windows(2).any(|w| w == ["-crf", "28"]));
        assert!(mp4.windows(2).any(|w| w == ["-movflags", "+faststart"]));
        assert!(mp4.last().unwrap().ends_with("story-video_optimized.mp4"));

        let webm: Vec<String> = plan.webm_args().iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert!(webm.windows(2).any(|w| w == ["-c:v", "libvpx-vp9"]));
        assert!(webm.windows(2).any(|w| w == ["-b:v", "0"]));
        assert!(webm.last().unwrap().ends_with("story-video.webm"));
    }

    #[test]
    fn missing_input_fails_before_ffmpeg() {
        let dir = tempfile::tempdir().unwrap();
        let plan = VideoPlan::new(dir.path(), "absent.mp4");
        let err = preflight(&plan, Path::new("ffmpeg")).unwrap_err();
        assert!(err.to_string().contains("video not found"));
    }

    #[test]
    fn missing_ffmpeg_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("v.mp4"), b"not really a video").unwrap();
        let plan = VideoPlan::new(dir.path(), "v.mp4");
        let bogus = dir.path().join("no-such-ffmpeg");
        assert!(!ffmpeg_available(&bogus));
        assert!(optimize(&plan, &bogus).is_err());
        assert!(plan.input.is_file(), "input untouched when preflight fails");
    }
}
