//! Per-track run state and outcomes

use std::fmt;

/// How a track session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Decoder ran out of audio
    Completed,
    /// Stop key pressed
    UserStopped,
    /// Open, decode or output failure
    Error,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Completed => write!(f, "completed"),
            Outcome::UserStopped => write!(f, "stopped"),
            Outcome::Error => write!(f, "error"),
        }
    }
}

/// Track session state machine
///
/// `Starting -> Playing <-> Paused`, then `Playing | Paused -> Stopping ->
/// Finished(UserStopped)` or `Playing -> Finished(Completed | Error)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Starting,
    Playing,
    Paused,
    Stopping,
    Finished(Outcome),
}

impl RunState {
    pub fn is_finished(&self) -> bool {
        matches!(self, RunState::Finished(_))
    }

    /// Pause toggle; other states are unchanged
    pub fn toggled(self) -> Self {
        match self {
            RunState::Playing => RunState::Paused,
            RunState::Paused => RunState::Playing,
            other => other,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Starting => write!(f, "starting"),
            RunState::Playing => write!(f, "playing"),
            RunState::Paused => write!(f, "paused"),
            RunState::Stopping => write!(f, "stopping"),
            RunState::Finished(outcome) => write!(f, "finished ({})", outcome),
        }
    }
}
