//! Playback control
//!
//! - `engine` - per-track poll/decode/write loop
//! - `modes` - single, sequential, reverse and repeat traversal
//! - `observer` - event hooks for the UI layer
//! - `state` - run states and outcomes

pub mod engine;
pub mod modes;
pub mod observer;
pub mod state;

pub use engine::{EngineSettings, PlaybackEngine, ProgressTracker};
pub use modes::{Mode, ModeEnd, ModeReport, SessionRecord};
pub use observer::PlaybackObserver;
pub use state::{Outcome, RunState};
