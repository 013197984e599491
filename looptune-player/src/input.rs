//! Keystroke input during playback
//!
//! Playback polls for single keys without blocking. The terminal is put in
//! raw mode for the duration of a track and restored afterwards through
//! [`InputScope`], whichever way the track ends.

use crate::error::{Error, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal;
use std::time::Duration;
use tracing::{debug, warn};

/// Playback control keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Stop,
    SeekBack,
    SeekForward,
}

impl Command {
    /// Map a key to a command; unrecognized keys map to `None`
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            ' ' => Some(Command::TogglePause),
            's' | 'S' => Some(Command::Stop),
            'j' => Some(Command::SeekBack),
            'k' => Some(Command::SeekForward),
            _ => None,
        }
    }
}

/// Non-blocking single-key source
pub trait InputPoller {
    /// Acquire the terminal (raw mode, no echo)
    fn begin(&mut self) -> Result<()>;

    /// Return a pending key press without waiting
    fn poll_key(&mut self) -> Option<char>;

    /// Restore the terminal. Safe to call without a matching `begin`.
    fn end(&mut self);
}

/// Scope guard pairing [`InputPoller::begin`] with [`InputPoller::end`]
pub struct InputScope<'a> {
    poller: &'a mut dyn InputPoller,
}

impl<'a> InputScope<'a> {
    pub fn acquire(poller: &'a mut dyn InputPoller) -> Result<Self> {
        poller.begin()?;
        Ok(Self { poller })
    }

    pub fn poll_command(&mut self) -> Option<Command> {
        let key = self.poller.poll_key()?;
        let command = Command::from_key(key);
        if command.is_none() {
            debug!("Ignoring key {:?}", key);
        }
        command
    }
}

impl Drop for InputScope<'_> {
    fn drop(&mut self) {
        self.poller.end();
    }
}

/// Crossterm-backed poller for an interactive terminal
#[derive(Debug, Default)]
pub struct TerminalInput {
    raw: bool,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputPoller for TerminalInput {
    fn begin(&mut self) -> Result<()> {
        if !self.raw {
            terminal::enable_raw_mode()
                .map_err(|e| Error::Input(format!("Failed to enable raw mode: {}", e)))?;
            self.raw = true;
        }
        Ok(())
    }

    fn poll_key(&mut self) -> Option<char> {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => {
                    warn!("Keyboard poll failed: {}", e);
                    return None;
                }
            }

            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if let KeyCode::Char(c) = key.code {
                        return Some(c);
                    }
                }
                // Resize, focus, release events etc.
                Ok(_) => {}
                Err(e) => {
                    warn!("Keyboard read failed: {}", e);
                    return None;
                }
            }
        }
    }

    fn end(&mut self) {
        if self.raw {
            if let Err(e) = terminal::disable_raw_mode() {
                warn!("Failed to restore terminal mode: {}", e);
            }
            self.raw = false;
        }
    }
}

impl Drop for TerminalInput {
    fn drop(&mut self) {
        self.end();
    }
}
