//! Track value type

use looptune_common::clean_title;
use looptune_common::record::SongRecord;
use serde::{Deserialize, Serialize};

/// One playable entry: where the audio lives and who performs it.
///
/// Tracks have no identity of their own; only their position in a
/// [`Playlist`](super::Playlist) distinguishes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Source locator (file path)
    pub source: String,

    /// Artist label
    pub artist: String,
}

impl Track {
    pub fn new(source: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            artist: artist.into(),
        }
    }

    /// Display title derived from the source locator
    pub fn title(&self) -> String {
        clean_title(&self.source)
    }
}

impl From<SongRecord> for Track {
    fn from(record: SongRecord) -> Self {
        Self {
            source: record.song,
            artist: record.artist,
        }
    }
}

impl From<&Track> for SongRecord {
    fn from(track: &Track) -> Self {
        SongRecord {
            song: track.source.clone(),
            artist: track.artist.clone(),
        }
    }
}
