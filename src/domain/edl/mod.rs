//! CMX-style Edit Decision List writer.
//!
//! Clips are laid back to back without trimming, so each event's source and
//! record timecodes are the same running range.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::path::{absolutize, to_forward_slashes};
use crate::utils::time::{Timecode, EDL_FRAME_RATE};

const REEL: &str = "AX";
const TRACK: &str = "V";
const CUT: &str = "C";

/// One clip of an EDL with its full duration
#[derive(Debug, Clone, PartialEq)]
pub struct EdlClip {
    pub path: PathBuf,
    pub duration: Duration,
}

impl EdlClip {
    pub fn new(path: impl Into<PathBuf>, duration: Duration) -> Self {
        Self {
            path: path.into(),
            duration,
        }
    }

    fn clip_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| to_forward_slashes(&self.path))
    }
}

/// Render an EDL document for `clips` in order
pub fn render_edl(title: &str, clips: &[EdlClip]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "TITLE: {}", title);
    let _ = writeln!(out, "FCM: NON-DROP FRAME");
    let _ = writeln!(out);

    let mut record = Timecode::from_frames(0, EDL_FRAME_RATE);
    for (index, clip) in clips.iter().enumerate() {
        let length = Timecode::from_duration(clip.duration, EDL_FRAME_RATE);
        let record_in = record;
        let record_out = record.advanced_by(length);

        let _ = writeln!(
            out,
            "{:03}  {:<8} {:<5} {:<8} {} {} {} {}",
            index + 1,
            REEL,
            TRACK,
            CUT,
            record_in,
            record_out,
            record_in,
            record_out
        );
        let _ = writeln!(out, "* FROM CLIP NAME: {}", clip.clip_name());
        let _ = writeln!(out, "* MEDIA FILE: {}", media_path(&clip.path));
        let _ = writeln!(out);

        record = record_out;
    }
    out
}

fn media_path(path: &Path) -> String {
    to_forward_slashes(&absolutize(path))
}
