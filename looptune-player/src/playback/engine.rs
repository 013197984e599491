//! Playback control engine
//!
//! Runs one track at a time on the calling thread. Each iteration of the
//! loop polls the keyboard without blocking, then (unless paused) decodes one
//! buffer and writes it to the sink. The sink write is the only place the
//! loop blocks, so key response time is bounded by one buffer.
//!
//! Session, sink and terminal mode are released on every exit path through
//! scope guards ([`TrackResources`] and [`InputScope`]).

use crate::audio::{AudioBackend, DecodeEvent, DecodeSession, OutputSink, PcmFormat};
use crate::error::{Error, Result};
use crate::input::{Command, InputPoller, InputScope};
use crate::playback::observer::PlaybackObserver;
use crate::playback::state::{Outcome, RunState};
use crate::playlist::Track;
use looptune_common::config::PlaybackConfig;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Engine timing knobs
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Seek distance for the seek keys, in seconds
    pub seek_step_secs: f64,

    /// Sleep between key polls while paused
    pub pause_idle: Duration,

    /// Wait between consecutive tracks of a mode
    pub track_gap: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&PlaybackConfig::default())
    }
}

impl From<&PlaybackConfig> for EngineSettings {
    fn from(config: &PlaybackConfig) -> Self {
        Self {
            seek_step_secs: config.seek_step_secs as f64,
            pause_idle: Duration::from_millis(config.pause_idle_ms),
            track_gap: Duration::from_millis(config.track_gap_ms),
        }
    }
}

/// Emits progress only when the whole percentage changes
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last: Option<Option<u8>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage for a position, or `None` when the length is unknown
    pub fn percent(position: u64, total: Option<u64>) -> Option<u8> {
        match total {
            Some(total) if total > 0 => Some((position.saturating_mul(100) / total).min(100) as u8),
            _ => None,
        }
    }

    /// New value to display, if it differs from the last one shown
    pub fn update(&mut self, position: u64, total: Option<u64>) -> Option<Option<u8>> {
        let percent = Self::percent(position, total);
        if self.last == Some(percent) {
            return None;
        }
        self.last = Some(percent);
        Some(percent)
    }
}

/// Open session and sink for one track; closes both exactly once
pub struct TrackResources {
    session: Box<dyn DecodeSession>,
    sink: Option<Box<dyn OutputSink>>,
    closed: bool,
}

impl TrackResources {
    fn new(session: Box<dyn DecodeSession>) -> Self {
        Self {
            session,
            sink: None,
            closed: false,
        }
    }

    /// Close sink then session; later calls do nothing
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(sink) = self.sink.as_mut() {
            sink.close();
        }
        self.session.close();
        debug!("Track resources released");
    }
}

impl Drop for TrackResources {
    fn drop(&mut self) {
        self.close();
    }
}

/// Drives decode sessions against output sinks under keyboard control
pub struct PlaybackEngine<B, I, O> {
    pub(crate) backend: B,
    pub(crate) input: I,
    pub(crate) observer: O,
    pub(crate) settings: EngineSettings,
}

impl<B, I, O> PlaybackEngine<B, I, O>
where
    B: AudioBackend,
    I: InputPoller,
    O: PlaybackObserver,
{
    pub fn new(backend: B, input: I, observer: O, settings: EngineSettings) -> Self {
        Self {
            backend,
            input,
            observer,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_parts(self) -> (B, I, O) {
        (self.backend, self.input, self.observer)
    }

    /// Play one track to its end, a stop key, or a failure.
    ///
    /// `index` / `sessions` place the track within the running mode and
    /// are only passed on to the observer. Failures come back as `Err` and
    /// correspond to [`Outcome::Error`].
    pub fn play_track(&mut self, track: &Track, index: usize, sessions: usize) -> Result<Outcome> {
        info!("Playing {} ({}/{})", track.source, index, sessions);
        let result = self.run_track(track, index, sessions);

        let outcome = match &result {
            Ok(outcome) => *outcome,
            Err(e) => {
                error!("Track failed: {}: {}", track.source, e);
                Outcome::Error
            }
        };
        info!("Track {}: {}", outcome, track.source);
        self.observer.track_finished(outcome);
        result
    }

    fn run_track(&mut self, track: &Track, index: usize, sessions: usize) -> Result<Outcome> {
        let mut state = RunState::Starting;
        debug!("State: {}", state);

        let session = self.backend.open_session(Path::new(&track.source))?;
        let mut resources = TrackResources::new(session);

        let format = resources.session.format();
        let sink = self.backend.open_sink(format)?;
        resources.sink = Some(sink);

        let total = resources.session.total_frames();
        self.observer.track_started(
            index,
            sessions,
            track,
            total.map(|frames| format.frames_to_secs(frames)),
        );

        let mut input = InputScope::acquire(&mut self.input)?;
        state = RunState::Playing;
        debug!("State: {}", state);

        let mut progress = ProgressTracker::new();
        let result = Self::stream(
            &mut resources,
            &mut input,
            &mut self.observer,
            &self.settings,
            format,
            &mut progress,
            &mut state,
        );

        if let Ok(Outcome::Completed) = result {
            if let Some(sink) = resources.sink.as_mut() {
                if let Err(e) = sink.drain() {
                    warn!("Drain failed: {}", e);
                }
            }
        }

        drop(input);
        resources.close();
        debug!("State: {}", state);
        result
    }

    /// The poll/decode/write loop
    fn stream(
        resources: &mut TrackResources,
        input: &mut InputScope<'_>,
        observer: &mut O,
        settings: &EngineSettings,
        format: PcmFormat,
        progress: &mut ProgressTracker,
        state: &mut RunState,
    ) -> Result<Outcome> {
        let result = loop {
            if let Some(command) = input.poll_command() {
                match command {
                    Command::TogglePause => {
                        *state = state.toggled();
                        match *state {
                            RunState::Paused => observer.paused(),
                            _ => observer.resumed(),
                        }
                        debug!("State: {}", state);
                    }
                    Command::Stop => {
                        *state = RunState::Stopping;
                        debug!("State: {}", state);
                    }
                    Command::SeekBack | Command::SeekForward => {
                        let step = if command == Command::SeekBack {
                            -settings.seek_step_secs
                        } else {
                            settings.seek_step_secs
                        };
                        match resources.session.seek_relative(step) {
                            Ok(frame) => observer.seeked(format.frames_to_secs(frame)),
                            Err(e) => warn!("Seek failed: {}", e),
                        }
                    }
                }
            }

            match *state {
                RunState::Stopping => break Ok(Outcome::UserStopped),
                RunState::Paused => {
                    thread::sleep(settings.pause_idle);
                    continue;
                }
                _ => {}
            }

            match resources.session.read_next() {
                Ok(DecodeEvent::Frames(samples)) => {
                    let sink = resources
                        .sink
                        .as_mut()
                        .ok_or_else(|| Error::AudioOutput("no output sink open".to_string()));
                    if let Err(e) = sink.and_then(|sink| sink.write(&samples)) {
                        break Err(e);
                    }
                    let position = resources.session.position_frames();
                    let total = resources.session.total_frames();
                    if let Some(percent) = progress.update(position, total) {
                        observer.progress(percent);
                    }
                }
                Ok(DecodeEvent::FormatChanged(new_format)) => {
                    warn!("Stream format changed to {}; output stays {}", new_format, format);
                    observer.format_changed(new_format);
                }
                Ok(DecodeEvent::Exhausted) => break Ok(Outcome::Completed),
                Err(e) => break Err(e),
            }
        };

        *state = RunState::Finished(match &result {
            Ok(outcome) => *outcome,
            Err(_) => Outcome::Error,
        });
        result
    }
}
