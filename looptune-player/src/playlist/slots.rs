//! Fixed set of playlist slots
//!
//! The player keeps a small, fixed number of playlists open at once. Each
//! slot is saved to and restored from `playlist{N}.json` where `N` is the
//! 1-based slot number.

use crate::error::{Error, Result};
use crate::playlist::store::Playlist;
use looptune_common::config::playlist_file_name;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Display name used when a slot's playlist has no name
pub fn default_slot_name(slot_number: usize) -> String {
    format!("Playlist {}", slot_number)
}

#[derive(Debug)]
pub struct PlaylistSlots {
    slots: Vec<Playlist>,
}

impl PlaylistSlots {
    /// Create `count` empty, inactive slots
    pub fn new(count: usize) -> Self {
        Self {
            slots: (0..count).map(|_| Playlist::new()).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Playlist in a 0-based slot
    pub fn get(&self, index: usize) -> Option<&Playlist> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Playlist> {
        self.slots.get_mut(index)
    }

    /// Display name for a 0-based slot
    pub fn display_name(&self, index: usize) -> String {
        match self.slots.get(index) {
            Some(list) if !list.name().is_empty() => list.name().to_string(),
            _ => default_slot_name(index + 1),
        }
    }

    /// Take the first inactive slot, wiping whatever it held before.
    ///
    /// Returns the 0-based slot index.
    pub fn claim_free(&mut self, name: impl Into<String>) -> Result<usize> {
        let index = self
            .slots
            .iter()
            .position(|list| !list.is_active())
            .ok_or_else(|| {
                Error::InvalidInput(format!("all {} playlist slots are in use", self.slots.len()))
            })?;

        let list = &mut self.slots[index];
        list.clear();
        list.set_name(name);
        list.set_active(true);
        info!("Claimed slot {} for '{}'", index + 1, list.name());
        Ok(index)
    }

    /// Clear a slot and mark it free
    pub fn release(&mut self, index: usize) -> Result<()> {
        let capacity = self.slots.len();
        let list = self.slots.get_mut(index).ok_or_else(|| {
            Error::InvalidInput(format!("slot {} does not exist (1-{})", index + 1, capacity))
        })?;
        list.clear();
        list.set_name("");
        list.set_active(false);
        info!("Released slot {}", index + 1);
        Ok(())
    }

    /// Active slots as `(index, playlist)` pairs
    pub fn active(&self) -> impl Iterator<Item = (usize, &Playlist)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, list)| list.is_active())
    }

    /// Saved file path for a 0-based slot
    pub fn slot_path(dir: &Path, index: usize) -> PathBuf {
        dir.join(playlist_file_name(index + 1))
    }

    /// Save every active slot; returns how many were written.
    ///
    /// A failed slot is logged and skipped so the others still get saved.
    pub fn save_all(&self, dir: &Path) -> usize {
        let mut saved = 0;
        for (index, list) in self.active() {
            let path = Self::slot_path(dir, index);
            match list.save(&path) {
                Ok(()) => saved += 1,
                Err(e) => warn!("Slot {} not saved: {}", index + 1, e),
            }
        }
        saved
    }

    /// Load saved files into every inactive slot; returns how many loaded
    pub fn load_all(&mut self, dir: &Path) -> usize {
        let mut loaded = 0;
        for (index, list) in self.slots.iter_mut().enumerate() {
            if list.is_active() {
                continue;
            }
            let path = Self::slot_path(dir, index);
            match list.load(&path) {
                Ok(true) => loaded += 1,
                Ok(false) => {}
                Err(e) => warn!("Slot {} not loaded: {}", index + 1, e),
            }
        }
        loaded
    }
}
