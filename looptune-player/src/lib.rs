//! # Looptune Player Library
//!
//! Circular playlists and a keyboard-controlled playback engine.
//!
//! **Purpose:** Keep ordered playlists of audio tracks, save and restore them
//! as JSON, and play them one track at a time with pause, seek and stop.
//!
//! **Architecture:** Single-threaded poll/decode/write loop over symphonia
//! decoders and a cpal output stream, with crossterm for keystrokes.

pub mod audio;
pub mod console;
pub mod error;
pub mod input;
pub mod playback;
pub mod playlist;
pub mod scan;

pub use error::{Error, Result, StoreError};
