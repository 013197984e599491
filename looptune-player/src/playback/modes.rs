//! Traversal modes
//!
//! Each mode walks a playlist and plays one track session at a time. A stop
//! key ends the whole mode at once; a failed track asks the observer whether
//! to go on.

use crate::audio::AudioBackend;
use crate::error::{Error, Result};
use crate::input::InputPoller;
use crate::playback::engine::PlaybackEngine;
use crate::playback::observer::PlaybackObserver;
use crate::playback::state::Outcome;
use crate::playlist::{NodeId, Playlist, TraversalStack};
use std::fmt;
use std::thread;
use tracing::{info, warn};

/// Traversal strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One track, by 1-based position
    Single(usize),
    /// Head to tail once
    Sequential,
    /// Tail to head once, via a [`TraversalStack`]
    Reverse,
    /// Head to tail `n` times; `n <= 0` plays nothing
    Repeat(i64),
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Single(position) => write!(f, "single (track {})", position),
            Mode::Sequential => write!(f, "sequential"),
            Mode::Reverse => write!(f, "reverse"),
            Mode::Repeat(rounds) => write!(f, "repeat x{}", rounds),
        }
    }
}

/// How a whole mode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEnd {
    /// Every planned session ran
    Finished,
    /// Stop key pressed; remaining sessions skipped
    UserStopped,
    /// A track failed and the observer chose not to continue
    Aborted,
    /// Nothing to play (empty playlist or non-positive repeat count)
    Skipped,
}

/// One finished track session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRecord {
    /// 1-based playlist position of the track
    pub position: usize,
    pub outcome: Outcome,
}

/// Summary of a mode run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeReport {
    pub mode: Mode,
    pub sessions: Vec<SessionRecord>,
    pub end: ModeEnd,
}

impl ModeReport {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            sessions: Vec::new(),
            end: ModeEnd::Finished,
        }
    }

    /// Positions in the order they were played
    pub fn positions(&self) -> Vec<usize> {
        self.sessions.iter().map(|s| s.position).collect()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.sessions.iter().filter(|s| s.outcome == outcome).count()
    }
}

/// Whether the driver moves on after a session
enum Step {
    Next,
    Halt,
}

impl<B, I, O> PlaybackEngine<B, I, O>
where
    B: AudioBackend,
    I: InputPoller,
    O: PlaybackObserver,
{
    /// Run a mode over a playlist.
    ///
    /// Only an invalid [`Mode::Single`] position or an oversized repeat count
    /// is an error; track failures are recorded in the report.
    pub fn play(&mut self, playlist: &Playlist, mode: Mode) -> Result<ModeReport> {
        let mut report = ModeReport::new(mode);

        match mode {
            Mode::Single(position) => {
                let id = playlist.node_at(position)?;
                self.observer.mode_started(mode, 1);
                self.step(playlist, id, position, 1, 1, &mut report);
            }
            Mode::Sequential => {
                let total = playlist.len();
                if total == 0 {
                    return Ok(self.skip(mode, report));
                }
                self.observer.mode_started(mode, total);
                for (i, id) in playlist.node_ids().enumerate() {
                    if let Step::Halt = self.step(playlist, id, i + 1, i + 1, total, &mut report) {
                        break;
                    }
                }
            }
            Mode::Reverse => {
                let total = playlist.len();
                if total == 0 {
                    return Ok(self.skip(mode, report));
                }
                self.observer.mode_started(mode, total);
                let mut stack = TraversalStack::from_playlist(playlist);
                let mut index = 0;
                while let Some(id) = stack.pop() {
                    index += 1;
                    let position = stack.len() + 1;
                    if let Step::Halt = self.step(playlist, id, position, index, total, &mut report) {
                        break;
                    }
                }
            }
            Mode::Repeat(rounds) => {
                let count = playlist.len();
                if rounds <= 0 || count == 0 {
                    if rounds <= 0 {
                        warn!("Repeat count {} plays nothing", rounds);
                    }
                    return Ok(self.skip(mode, report));
                }
                let total = usize::try_from(rounds)
                    .ok()
                    .and_then(|rounds| rounds.checked_mul(count))
                    .ok_or_else(|| {
                        Error::InvalidInput(format!("repeat count {} is too large", rounds))
                    })?;
                let Some(mut id) = playlist.head() else {
                    return Ok(self.skip(mode, report));
                };

                self.observer.mode_started(mode, total);
                for i in 0..total {
                    let position = i % count + 1;
                    if let Step::Halt = self.step(playlist, id, position, i + 1, total, &mut report) {
                        break;
                    }
                    id = playlist.next_of(id);
                }
            }
        }

        info!(
            "Mode {} ended: {:?} after {} sessions",
            mode,
            report.end,
            report.sessions.len()
        );
        self.observer.mode_finished(&report);
        Ok(report)
    }

    fn skip(&mut self, mode: Mode, mut report: ModeReport) -> ModeReport {
        info!("Mode {}: nothing to play", mode);
        report.end = ModeEnd::Skipped;
        self.observer.mode_finished(&report);
        report
    }

    /// Play one session of a mode and decide whether to go on
    fn step(
        &mut self,
        playlist: &Playlist,
        id: NodeId,
        position: usize,
        index: usize,
        total: usize,
        report: &mut ModeReport,
    ) -> Step {
        if index > 1 && !self.settings.track_gap.is_zero() {
            self.observer.between_tracks(self.settings.track_gap);
            thread::sleep(self.settings.track_gap);
        }

        let track = playlist.track(id);
        let result = self.play_track(track, index, total);
        let outcome = match &result {
            Ok(outcome) => *outcome,
            Err(_) => Outcome::Error,
        };
        report.sessions.push(SessionRecord { position, outcome });

        match result {
            Ok(Outcome::UserStopped) => {
                report.end = ModeEnd::UserStopped;
                Step::Halt
            }
            Ok(_) => Step::Next,
            Err(e) => {
                if self.observer.continue_after_error(track, &e) {
                    Step::Next
                } else {
                    report.end = ModeEnd::Aborted;
                    Step::Halt
                }
            }
        }
    }
}
