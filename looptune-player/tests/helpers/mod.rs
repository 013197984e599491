//! Test helper modules for looptune-player integration tests
//!
//! - mock_audio: scripted backend, sink, keyboard and observer
//! - audio_generator: WAV and MP3 files for the real decode paths

#![allow(dead_code)]

pub mod audio_generator;
pub mod mock_audio;

pub use audio_generator::{
    generate_silent_mp3, generate_silent_wav, generate_sine_wav, MP3_FRAMES_PER_PACKET,
    MP3_SAMPLE_RATE, TEST_SAMPLE_RATE,
};
pub use mock_audio::{
    new_log, MockBackend, MockLog, RecordingObserver, ScriptedInput, SharedLog, SourceScript,
    BUFFER_FRAMES, MOCK_FORMAT,
};

use looptune_player::playback::{EngineSettings, PlaybackEngine};
use looptune_player::playlist::{Playlist, Track};
use std::time::Duration;

/// Settings with no waiting between tracks and a 1 ms pause idle
pub fn fast_settings() -> EngineSettings {
    EngineSettings {
        seek_step_secs: 10.0,
        pause_idle: Duration::from_millis(1),
        track_gap: Duration::ZERO,
    }
}

/// Playlist of `t1.mp3`, `t2.mp3`, ... by a single artist
pub fn numbered_playlist(count: usize) -> Playlist {
    let mut list = Playlist::with_name("test");
    for i in 1..=count {
        list.insert_back(Track::new(format!("t{}.mp3", i), "Artist"));
    }
    list
}

pub type MockEngine = PlaybackEngine<MockBackend, ScriptedInput, RecordingObserver>;

/// Engine over mocks with [`fast_settings`]
pub fn mock_engine(backend: MockBackend, input: ScriptedInput, observer: RecordingObserver) -> MockEngine {
    PlaybackEngine::new(backend, input, observer, fast_settings())
}
