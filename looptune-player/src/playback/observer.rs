//! Playback event hooks
//!
//! The engine reports everything a user-facing layer needs through
//! [`PlaybackObserver`]. Every hook has a do-nothing default, so an observer
//! only implements what it shows.

use crate::audio::PcmFormat;
use crate::error::Error;
use crate::playback::modes::{Mode, ModeReport};
use crate::playback::state::Outcome;
use crate::playlist::Track;
use std::time::Duration;

#[allow(unused_variables)]
pub trait PlaybackObserver {
    /// A mode is about to run `sessions` track sessions
    fn mode_started(&mut self, mode: Mode, sessions: usize) {}

    /// Session `index` (1-based) of `sessions` opened; `duration_secs` is
    /// `None` when the length is unknown
    fn track_started(&mut self, index: usize, sessions: usize, track: &Track, duration_secs: Option<f64>) {}

    /// Whole-percent progress, sent only when it changes. `None` (sent once)
    /// means the length is unknown.
    fn progress(&mut self, percent: Option<u8>) {}

    fn paused(&mut self) {}

    fn resumed(&mut self) {}

    /// Read position after a seek, in seconds
    fn seeked(&mut self, position_secs: f64) {}

    /// Decoder switched layout mid-track; output keeps its format
    fn format_changed(&mut self, format: PcmFormat) {}

    fn track_finished(&mut self, outcome: Outcome) {}

    /// A track failed. Return `true` to go on with the next track, `false`
    /// to abort the mode.
    fn continue_after_error(&mut self, track: &Track, error: &Error) -> bool {
        false
    }

    /// About to wait `gap` before the next track
    fn between_tracks(&mut self, gap: Duration) {}

    fn mode_finished(&mut self, report: &ModeReport) {}
}
