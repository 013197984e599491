//! Playlist save/load
//!
//! Reads and writes the JSON record defined in
//! [`looptune_common::record`]. Loading parses the whole file before touching
//! the playlist, so a bad file never leaves a half-filled list behind.

use crate::error::{Error, Result};
use crate::playlist::store::Playlist;
use crate::playlist::track::Track;
use looptune_common::record::{PlaylistRecord, SongRecord};
use std::path::Path;
use tracing::{debug, info, warn};

impl Playlist {
    /// Snapshot as a persistence record
    pub fn to_record(&self) -> PlaylistRecord {
        let songs: Vec<SongRecord> = self.iter().map(SongRecord::from).collect();
        PlaylistRecord::new(self.name(), songs)
    }

    /// Write the playlist as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self
            .to_record()
            .to_pretty_json()
            .map_err(|e| Error::Persistence(format!("Failed to encode playlist: {}", e)))?;

        std::fs::write(path, text).map_err(|e| {
            Error::Persistence(format!("Failed to write {}: {}", path.display(), e))
        })?;

        info!("Saved '{}' ({} tracks) to {}", self.name(), self.len(), path.display());
        Ok(())
    }

    /// Replace contents from a saved file.
    ///
    /// Returns `Ok(false)` when the file is absent or unreadable. A file that
    /// cannot be parsed, including one that is not UTF-8, is an error and
    /// leaves the playlist untouched.
    pub fn load(&mut self, path: &Path) -> Result<bool> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("No playlist loaded from {}: {}", path.display(), e);
                return Ok(false);
            }
        };

        let decoded = PlaylistRecord::parse_lenient_bytes(&bytes).map_err(|e| {
            Error::Persistence(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        for notice in &decoded.notices {
            warn!("{}: {}", path.display(), notice);
        }

        self.clear();
        self.set_name(decoded.record.list_name);
        for song in decoded.record.songs {
            self.insert_back(Track::from(song));
        }
        self.set_active(true);

        info!("Loaded '{}' ({} tracks) from {}", self.name(), self.len(), path.display());
        Ok(true)
    }
}
