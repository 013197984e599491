//! Playlist persistence record
//!
//! On-disk layout of a saved playlist:
//!
//! ```json
//! {
//!     "listName": "Road Trip",
//!     "length": 2,
//!     "songs": [
//!         { "song": "music/a.mp3", "artist": "Art1" },
//!         { "song": "music/b.mp3", "artist": "Art2" }
//!     ]
//! }
//! ```
//!
//! Decoding is lenient in the same places the player has always been lenient:
//! a bad name is replaced, malformed song entries are skipped and a `length`
//! that disagrees with the entry count is only reported. Anything that is not
//! a JSON object at the top level is rejected.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Longest playlist name kept on load (in characters)
pub const MAX_LIST_NAME_CHARS: usize = 100;

/// One saved track entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub song: String,
    pub artist: String,
}

/// Whole saved playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRecord {
    #[serde(rename = "listName")]
    pub list_name: String,
    pub length: i64,
    pub songs: Vec<SongRecord>,
}

/// Non-fatal findings while decoding a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordNotice {
    /// `listName` contained a NUL byte and was replaced by an empty name
    NameHasNul,
    /// `listName` exceeded [`MAX_LIST_NAME_CHARS`] and was truncated
    NameTruncated { original_chars: usize },
    /// Entry at this array index lacked a string `song` or `artist`
    SkippedEntry { index: usize },
    /// Declared `length` differs from the number of usable entries
    LengthMismatch { declared: i64, loaded: usize },
}

impl std::fmt::Display for RecordNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordNotice::NameHasNul => {
                write!(f, "playlist name contains null bytes, using default name")
            }
            RecordNotice::NameTruncated { original_chars } => write!(
                f,
                "playlist name too long ({} chars), truncated to {}",
                original_chars, MAX_LIST_NAME_CHARS
            ),
            RecordNotice::SkippedEntry { index } => {
                write!(f, "skipping improperly formatted song entry #{}", index + 1)
            }
            RecordNotice::LengthMismatch { declared, loaded } => {
                write!(f, "expected {} songs, loaded {}", declared, loaded)
            }
        }
    }
}

/// Result of a lenient decode
#[derive(Debug, Clone)]
pub struct DecodedRecord {
    pub record: PlaylistRecord,
    pub notices: Vec<RecordNotice>,
}

impl PlaylistRecord {
    /// Build a record from a name and ordered entries; `length` follows the entries
    pub fn new(list_name: impl Into<String>, songs: Vec<SongRecord>) -> Self {
        Self {
            list_name: list_name.into(),
            length: songs.len() as i64,
            songs,
        }
    }

    /// Serialize with 4-space indentation
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(out).map_err(|e| Error::InvalidInput(e.to_string()))
    }

    /// Decode record text, collecting non-fatal notices instead of failing
    pub fn parse_lenient(text: &str) -> Result<DecodedRecord> {
        Self::parse_lenient_bytes(text.as_bytes())
    }

    /// Same as [`parse_lenient`](Self::parse_lenient) for raw file contents.
    ///
    /// Bytes that are not valid UTF-8 are a JSON error, not a read failure.
    pub fn parse_lenient_bytes(bytes: &[u8]) -> Result<DecodedRecord> {
        let value: Value = serde_json::from_slice(bytes)?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::InvalidInput("playlist record is not a JSON object".to_string()))?;

        let mut notices = Vec::new();

        let list_name = match object.get("listName").and_then(Value::as_str) {
            Some(name) if name.contains('\0') => {
                notices.push(RecordNotice::NameHasNul);
                String::new()
            }
            Some(name) => {
                let chars = name.chars().count();
                if chars > MAX_LIST_NAME_CHARS {
                    notices.push(RecordNotice::NameTruncated {
                        original_chars: chars,
                    });
                    name.chars().take(MAX_LIST_NAME_CHARS).collect()
                } else {
                    name.to_string()
                }
            }
            None => String::new(),
        };

        let mut songs = Vec::new();
        if let Some(entries) = object.get("songs").and_then(Value::as_array) {
            for (index, entry) in entries.iter().enumerate() {
                let song = entry.get("song").and_then(Value::as_str);
                let artist = entry.get("artist").and_then(Value::as_str);
                match (song, artist) {
                    (Some(song), Some(artist)) => songs.push(SongRecord {
                        song: song.to_string(),
                        artist: artist.to_string(),
                    }),
                    _ => notices.push(RecordNotice::SkippedEntry { index }),
                }
            }
        }

        let declared = object.get("length").and_then(Value::as_i64);
        if let Some(declared) = declared {
            if declared != songs.len() as i64 {
                notices.push(RecordNotice::LengthMismatch {
                    declared,
                    loaded: songs.len(),
                });
            }
        }

        let length = songs.len() as i64;
        Ok(DecodedRecord {
            record: PlaylistRecord {
                list_name,
                length,
                songs,
            },
            notices,
        })
    }
}
