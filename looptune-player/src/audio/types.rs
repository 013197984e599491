//! Audio value types shared by decode sessions and output sinks

use std::fmt;
use std::path::Path;

/// PCM stream layout negotiated when a session opens.
///
/// Samples travelling from a session to a sink are always interleaved
/// signed 16-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    /// Frames per second
    pub sample_rate: u32,

    /// Interleaved channel count
    pub channels: u16,
}

impl PcmFormat {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Number of interleaved samples in `frames` frames
    pub fn samples_for_frames(&self, frames: usize) -> usize {
        frames * self.channels as usize
    }

    /// Convert a frame count to seconds
    pub fn frames_to_secs(&self, frames: u64) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        frames as f64 / self.sample_rate as f64
    }
}

impl fmt::Display for PcmFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz, {} ch", self.sample_rate, self.channels)
    }
}

/// One step of a decode session
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeEvent {
    /// Interleaved samples in the negotiated format
    Frames(Vec<i16>),

    /// Source has no more audio
    Exhausted,

    /// Stream switched to a different rate/channel layout.
    ///
    /// Samples keep coming in the negotiated layout; the sink is not reopened.
    FormatChanged(PcmFormat),
}

/// Which decode path handles a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Frame-indexed compressed audio (MP3)
    Compressed,

    /// Header-described sampled audio (WAV, FLAC, OGG, ...)
    Sampled,
}

impl BackendKind {
    /// Pick a backend from the source extension.
    ///
    /// `.mp3` (any case) goes to the compressed path; everything else,
    /// including sources without an extension, goes to the sampled path.
    pub fn for_source(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("mp3") => BackendKind::Compressed,
            _ => BackendKind::Sampled,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Compressed => write!(f, "compressed"),
            BackendKind::Sampled => write!(f, "sampled"),
        }
    }
}
