//! Scripted audio backend, keyboard and observer for engine tests
//!
//! Nothing here touches audio hardware or the terminal. Every mock writes
//! what happened into a shared [`MockLog`] so tests can check ordering and
//! cleanup after the engine returns.

use looptune_player::audio::{AudioBackend, DecodeEvent, DecodeSession, OutputSink, PcmFormat};
use looptune_player::error::{Error, Result};
use looptune_player::input::InputPoller;
use looptune_player::playback::{Mode, ModeReport, Outcome, PlaybackObserver};
use looptune_player::playlist::Track;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

/// Frames delivered per mock decode buffer
pub const BUFFER_FRAMES: usize = 100;

/// Format every mock session negotiates
pub const MOCK_FORMAT: PcmFormat = PcmFormat {
    sample_rate: 1000,
    channels: 2,
};

/// How one mock source behaves
#[derive(Debug, Clone)]
pub struct SourceScript {
    /// Buffers before the source is exhausted
    pub buffers: usize,
    /// Report a total length
    pub known_length: bool,
    /// Fail the read of this 0-based buffer
    pub fail_at: Option<usize>,
    /// Refuse to open
    pub open_fails: bool,
    /// Report a format change before this 0-based buffer
    pub format_change_at: Option<usize>,
}

impl Default for SourceScript {
    fn default() -> Self {
        Self {
            buffers: 5,
            known_length: true,
            fail_at: None,
            open_fails: false,
            format_change_at: None,
        }
    }
}

impl SourceScript {
    pub fn buffers(buffers: usize) -> Self {
        Self {
            buffers,
            ..Self::default()
        }
    }

    pub fn failing_at(buffer: usize) -> Self {
        Self {
            fail_at: Some(buffer),
            ..Self::default()
        }
    }

    pub fn unopenable() -> Self {
        Self {
            open_fails: true,
            ..Self::default()
        }
    }
}

/// Everything the mocks observed
#[derive(Debug, Default)]
pub struct MockLog {
    /// Sources in the order sessions were opened
    pub opened: Vec<String>,
    pub session_closes: usize,
    pub sink_opens: usize,
    pub sink_closes: usize,
    pub drains: usize,
    pub writes: usize,
    pub samples_written: usize,
    /// Absolute frames requested from `seek_to_frame`
    pub seeks: Vec<u64>,
    pub input_begins: usize,
    pub input_ends: usize,
}

pub type SharedLog = Rc<RefCell<MockLog>>;

pub fn new_log() -> SharedLog {
    Rc::new(RefCell::new(MockLog::default()))
}

/// Backend serving scripted sources by locator
pub struct MockBackend {
    scripts: HashMap<String, SourceScript>,
    log: SharedLog,
    sink_write_fails: bool,
}

impl MockBackend {
    pub fn new(log: SharedLog) -> Self {
        Self {
            scripts: HashMap::new(),
            log,
            sink_write_fails: false,
        }
    }

    /// Script a source; unscripted sources use [`SourceScript::default`]
    pub fn with_source(mut self, source: &str, script: SourceScript) -> Self {
        self.scripts.insert(source.to_string(), script);
        self
    }

    pub fn with_failing_sink(mut self) -> Self {
        self.sink_write_fails = true;
        self
    }
}

impl AudioBackend for MockBackend {
    fn open_session(&mut self, source: &Path) -> Result<Box<dyn DecodeSession>> {
        let key = source.to_string_lossy().to_string();
        let script = self.scripts.get(&key).cloned().unwrap_or_default();
        if script.open_fails {
            return Err(Error::BackendOpen {
                path: source.to_path_buf(),
                reason: "scripted open failure".to_string(),
            });
        }
        self.log.borrow_mut().opened.push(key);
        Ok(Box::new(MockSession {
            script,
            log: Rc::clone(&self.log),
            next_buffer: 0,
            position: 0,
            format_reported: false,
        }))
    }

    fn open_sink(&mut self, format: PcmFormat) -> Result<Box<dyn OutputSink>> {
        assert_eq!(format, MOCK_FORMAT, "sink opened with the session format");
        self.log.borrow_mut().sink_opens += 1;
        Ok(Box::new(MockSink {
            log: Rc::clone(&self.log),
            write_fails: self.sink_write_fails,
        }))
    }
}

struct MockSession {
    script: SourceScript,
    log: SharedLog,
    next_buffer: usize,
    position: u64,
    format_reported: bool,
}

impl DecodeSession for MockSession {
    fn format(&self) -> PcmFormat {
        MOCK_FORMAT
    }

    fn read_next(&mut self) -> Result<DecodeEvent> {
        if self.script.fail_at == Some(self.next_buffer) {
            return Err(Error::Decode("scripted decode failure".to_string()));
        }
        if self.script.format_change_at == Some(self.next_buffer) && !self.format_reported {
            self.format_reported = true;
            return Ok(DecodeEvent::FormatChanged(PcmFormat::new(2000, 1)));
        }
        if self.next_buffer >= self.script.buffers {
            return Ok(DecodeEvent::Exhausted);
        }
        self.next_buffer += 1;
        self.position += BUFFER_FRAMES as u64;
        Ok(DecodeEvent::Frames(vec![0; MOCK_FORMAT.samples_for_frames(BUFFER_FRAMES)]))
    }

    fn position_frames(&self) -> u64 {
        self.position
    }

    fn total_frames(&self) -> Option<u64> {
        self.script
            .known_length
            .then(|| (self.script.buffers * BUFFER_FRAMES) as u64)
    }

    fn seek_to_frame(&mut self, frame: u64) -> Result<u64> {
        self.log.borrow_mut().seeks.push(frame);
        self.position = frame;
        Ok(frame)
    }

    fn close(&mut self) {
        self.log.borrow_mut().session_closes += 1;
    }
}

struct MockSink {
    log: SharedLog,
    write_fails: bool,
}

impl OutputSink for MockSink {
    fn write(&mut self, samples: &[i16]) -> Result<()> {
        if self.write_fails {
            return Err(Error::AudioOutput("scripted write failure".to_string()));
        }
        let mut log = self.log.borrow_mut();
        log.writes += 1;
        log.samples_written += samples.len();
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        self.log.borrow_mut().drains += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.log.borrow_mut().sink_closes += 1;
    }
}

/// Keyboard that types scripted keys during chosen sessions.
///
/// Keys queued for session `n` (1-based, counted by opened sessions) are
/// returned one per poll while that session is playing.
pub struct ScriptedInput {
    log: SharedLog,
    keys: HashMap<usize, Vec<char>>,
}

impl ScriptedInput {
    pub fn new(log: SharedLog) -> Self {
        Self {
            log,
            keys: HashMap::new(),
        }
    }

    pub fn keys_in_session(mut self, session: usize, keys: &str) -> Self {
        // Stored reversed so `pop` yields them in typing order
        self.keys.insert(session, keys.chars().rev().collect());
        self
    }
}

impl InputPoller for ScriptedInput {
    fn begin(&mut self) -> Result<()> {
        self.log.borrow_mut().input_begins += 1;
        Ok(())
    }

    fn poll_key(&mut self) -> Option<char> {
        let session = self.log.borrow().opened.len();
        self.keys.get_mut(&session).and_then(|keys| keys.pop())
    }

    fn end(&mut self) {
        self.log.borrow_mut().input_ends += 1;
    }
}

/// Observer that records events as short strings
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<String>,
    pub progress: Vec<Option<u8>>,
    pub continue_on_error: bool,
    pub error_prompts: usize,
    pub reports: Vec<ModeReport>,
}

impl RecordingObserver {
    pub fn continuing() -> Self {
        Self {
            continue_on_error: true,
            ..Self::default()
        }
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.iter().filter(|e| e.as_str() == event).count()
    }
}

impl PlaybackObserver for RecordingObserver {
    fn mode_started(&mut self, mode: Mode, sessions: usize) {
        self.events.push(format!("mode {} x{}", mode, sessions));
    }

    fn track_started(&mut self, index: usize, _sessions: usize, track: &Track, _duration: Option<f64>) {
        self.events.push(format!("start {} {}", index, track.source));
    }

    fn progress(&mut self, percent: Option<u8>) {
        self.progress.push(percent);
    }

    fn paused(&mut self) {
        self.events.push("paused".to_string());
    }

    fn resumed(&mut self) {
        self.events.push("resumed".to_string());
    }

    fn seeked(&mut self, _position_secs: f64) {
        self.events.push("seeked".to_string());
    }

    fn format_changed(&mut self, _format: PcmFormat) {
        self.events.push("format changed".to_string());
    }

    fn track_finished(&mut self, outcome: Outcome) {
        self.events.push(format!("finished {}", outcome));
    }

    fn continue_after_error(&mut self, _track: &Track, _error: &Error) -> bool {
        self.error_prompts += 1;
        self.continue_on_error
    }

    fn between_tracks(&mut self, _gap: Duration) {
        self.events.push("gap".to_string());
    }

    fn mode_finished(&mut self, report: &ModeReport) {
        self.reports.push(report.clone());
    }
}
