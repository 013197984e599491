//! Console presentation
//!
//! Playlist listings and the in-place progress bar. Output during playback
//! ends lines with `\r\n` because the terminal is in raw mode then.

use crate::audio::{OutputDevice, PcmFormat};
use crate::error::Error;
use crate::playback::{Mode, ModeEnd, ModeReport, Outcome, PlaybackObserver};
use crate::playlist::{Playlist, Track};
use std::io::{self, BufRead, Write};
use std::time::Duration;

/// Width of the progress bar in characters
pub const PROGRESS_BAR_WIDTH: usize = 25;

const TITLE_WIDTH: usize = 35;
const ARTIST_WIDTH: usize = 20;

/// Cut `text` to at most `width` characters
pub fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Render a progress bar such as `[#####--------------------]  20%`
pub fn progress_bar(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * PROGRESS_BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
        percent
    )
}

fn format_time(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Table of a playlist's tracks, one line per track
pub fn render_listing(playlist: &Playlist) -> String {
    let mut out = String::new();
    let name = if playlist.name().is_empty() {
        "(unnamed)"
    } else {
        playlist.name()
    };
    out.push_str(&format!("{} - {} tracks\n", name, playlist.len()));

    if playlist.is_empty() {
        out.push_str("The playlist is empty.\n");
        return out;
    }

    out.push_str(&format!(
        "{:>4}  {:<title$}  {:<artist$}\n",
        "#",
        "Title",
        "Artist",
        title = TITLE_WIDTH,
        artist = ARTIST_WIDTH
    ));
    for (position, track) in playlist.iter_positions() {
        out.push_str(&format!(
            "{:>4}  {:<title$}  {:<artist$}\n",
            position,
            truncate(&track.title(), TITLE_WIDTH),
            truncate(&track.artist, ARTIST_WIDTH),
            title = TITLE_WIDTH,
            artist = ARTIST_WIDTH
        ));
    }
    out
}

/// Search hits as `position: title - artist` lines
pub fn render_matches(matches: &[(usize, &Track)]) -> String {
    if matches.is_empty() {
        return "No matching tracks.\n".to_string();
    }
    matches
        .iter()
        .map(|(position, track)| format!("{:>4}: {} - {}\n", position, track.title(), track.artist))
        .collect()
}

/// Device names, default marked with `*`, for the `devices` command
pub fn render_devices(devices: &[OutputDevice]) -> String {
    if devices.is_empty() {
        return "No output devices found.\n".to_string();
    }
    devices
        .iter()
        .map(|device| {
            let marker = if device.is_default { '*' } else { ' ' };
            format!("{} {}\n", marker, device.name)
        })
        .collect()
}

/// Ask a yes/no question on stdin; anything but `y`/`Y` is no
pub fn confirm(question: &str) -> bool {
    print!("{} (Y/N): ", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y"),
        Err(_) => false,
    }
}

/// Observer printing playback state to stdout
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    duration: Option<f64>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn line(&self, text: &str) {
        print!("\r{}\r\n", text);
        let _ = io::stdout().flush();
    }
}

impl PlaybackObserver for ConsoleObserver {
    fn mode_started(&mut self, mode: Mode, sessions: usize) {
        self.line(&format!("Playing {} ({} tracks)", mode, sessions));
        self.line("Controls: [space] pause/resume  [s] stop  [j] back  [k] forward");
    }

    fn track_started(&mut self, index: usize, sessions: usize, track: &Track, duration_secs: Option<f64>) {
        self.duration = duration_secs;
        let length = duration_secs
            .map(format_time)
            .unwrap_or_else(|| "?:??".to_string());
        self.line(&format!(
            "[{}/{}] {} - {} ({})",
            index,
            sessions,
            track.title(),
            track.artist,
            length
        ));
    }

    fn progress(&mut self, percent: Option<u8>) {
        match percent {
            Some(percent) => {
                print!("\r{}", progress_bar(percent));
                let _ = io::stdout().flush();
            }
            None => self.line("Playing (length unknown)"),
        }
    }

    fn paused(&mut self) {
        self.line("Paused");
    }

    fn resumed(&mut self) {
        self.line("Resumed");
    }

    fn seeked(&mut self, position_secs: f64) {
        let total = self
            .duration
            .map(format_time)
            .unwrap_or_else(|| "?:??".to_string());
        self.line(&format!("Seek to {} / {}", format_time(position_secs), total));
    }

    fn format_changed(&mut self, format: PcmFormat) {
        self.line(&format!("Stream format changed to {}", format));
    }

    fn track_finished(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Completed => self.line(""),
            Outcome::UserStopped => self.line("Stopped"),
            Outcome::Error => self.line("Playback failed"),
        }
    }

    fn continue_after_error(&mut self, track: &Track, error: &Error) -> bool {
        self.line(&format!("Error playing {}: {}", track.source, error));
        confirm("Continue with the next track?")
    }

    fn between_tracks(&mut self, gap: Duration) {
        self.line(&format!("Next track in {:.1}s...", gap.as_secs_f64()));
    }

    fn mode_finished(&mut self, report: &ModeReport) {
        let summary = match report.end {
            ModeEnd::Finished => "Finished",
            ModeEnd::UserStopped => "Stopped by user",
            ModeEnd::Aborted => "Aborted after an error",
            ModeEnd::Skipped => "Nothing to play",
        };
        self.line(&format!(
            "{}: {} played, {} failed",
            summary,
            report.count(Outcome::Completed),
            report.count(Outcome::Error)
        ));
    }
}
