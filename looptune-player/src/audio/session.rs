//! Decode session and output sink contracts
//!
//! The playback engine only talks to audio through these traits. The real
//! implementations are [`CompressedSession`](super::CompressedSession),
//! [`SampledSession`](super::SampledSession) and
//! [`DeviceSink`](super::DeviceSink); tests substitute scripted ones.

use crate::audio::types::{DecodeEvent, PcmFormat};
use crate::error::Result;
use std::path::Path;

/// An open decoder for one source
pub trait DecodeSession {
    /// Format fixed when the session opened
    fn format(&self) -> PcmFormat;

    /// Decode the next buffer
    fn read_next(&mut self) -> Result<DecodeEvent>;

    /// Current read position in frames from the start of the source
    fn position_frames(&self) -> u64;

    /// Total length in frames, when known
    fn total_frames(&self) -> Option<u64>;

    /// Move the read position to an absolute frame.
    ///
    /// Callers pass an already clamped target. Returns the frame actually
    /// reached, which may differ for coarse seeking backends.
    fn seek_to_frame(&mut self, frame: u64) -> Result<u64>;

    /// Move the read position by a signed number of seconds.
    ///
    /// The target is clamped with [`clamp_seek_target`] before the backend
    /// sees it.
    fn seek_relative(&mut self, secs: f64) -> Result<u64> {
        let format = self.format();
        let delta = (secs * format.sample_rate as f64).round() as i64;
        let target = clamp_seek_target(self.position_frames(), delta, self.total_frames());
        self.seek_to_frame(target)
    }

    /// Release decoder resources. Safe to call more than once.
    fn close(&mut self);
}

/// Blocking PCM writer opened for one fixed format
pub trait OutputSink {
    /// Queue interleaved samples, blocking while the sink is full
    fn write(&mut self, samples: &[i16]) -> Result<()>;

    /// Block until everything written so far has been played
    fn drain(&mut self) -> Result<()>;

    /// Stop output and release the device. Safe to call more than once.
    fn close(&mut self);
}

/// Factory for sessions and sinks
pub trait AudioBackend {
    /// Open a decode session for a source
    fn open_session(&mut self, source: &Path) -> Result<Box<dyn DecodeSession>>;

    /// Open an output sink for exactly `format`
    fn open_sink(&mut self, format: PcmFormat) -> Result<Box<dyn OutputSink>>;
}

/// Clamp a relative seek to the playable range.
///
/// The result is never negative. With a known total it is at most
/// `total - 1`; with an unknown total only the lower bound applies.
pub fn clamp_seek_target(current: u64, delta_frames: i64, total: Option<u64>) -> u64 {
    let target = if delta_frames < 0 {
        current.saturating_sub(delta_frames.unsigned_abs())
    } else {
        current.saturating_add(delta_frames as u64)
    };

    match total {
        Some(total) => target.min(total.saturating_sub(1)),
        None => target,
    }
}
