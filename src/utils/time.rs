//! Timecode formatting utilities

use std::fmt;
use std::time::Duration;

/// Frame rate used for EDL timecodes
pub const EDL_FRAME_RATE: u32 = 24;

/// Non-drop-frame timecode counted in whole frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timecode {
    frames: u64,
    rate: u32,
}

impl Timecode {
    /// Create a timecode from a frame count
    pub fn from_frames(frames: u64, rate: u32) -> Self {
        Self {
            frames,
            rate: rate.max(1),
        }
    }

    /// Create a timecode from a duration, rounded to the nearest frame
    pub fn from_duration(duration: Duration, rate: u32) -> Self {
        let rate = rate.max(1);
        let frames = (duration.as_secs_f64() * rate as f64).round() as u64;
        Self { frames, rate }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Advance by another timecode's frame count
    pub fn advanced_by(&self, other: Timecode) -> Timecode {
        Timecode::from_frames(self.frames + other.frames, self.rate)
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rate = u64::from(self.rate);
        let total_seconds = self.frames / rate;
        let frames = self.frames % rate;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        write!(f, "{:02}:{:02}:{:02}:{:02}", hours, minutes, seconds, frames)
    }
}

/// Format a duration as HH:MM:SS.ms for display
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let milliseconds = duration.subsec_millis();

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
    }
}
