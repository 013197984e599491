//! Music folder listing
//!
//! Finds playable files directly inside the music folder (no recursion).
//! A file qualifies when its extension is supported and its first bytes
//! look like that kind of audio.

use crate::error::{Error, Result};
use looptune_common::clean_title;
use looptune_common::title::fold_case;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extensions the decoders handle
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["mp3", "wav", "flac", "ogg"];

/// Whether a path has a supported extension (any case)
pub fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Check the file header against known audio signatures
fn has_audio_signature(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    let mut buffer = [0u8; 12];
    let bytes_read = file.read(&mut buffer)?;

    if bytes_read < 4 {
        return Ok(false);
    }

    let is_audio = match &buffer[..bytes_read] {
        // MPEG audio frame sync (11 set bits, any version or CRC flag) or ID3 tag
        [0xFF, second, ..] if second & 0xE0 == 0xE0 => true,
        [b'I', b'D', b'3', ..] => true,

        [b'f', b'L', b'a', b'C', ..] => true,
        [b'O', b'g', b'g', b'S', ..] => true,
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E'] => true,

        _ => false,
    };
    Ok(is_audio)
}

/// Playable files in `dir`, sorted case-insensitively by cleaned title
pub fn scan_music_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InvalidInput(format!(
            "music folder not found: {}",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error accessing entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() || !is_supported_extension(&path) {
            continue;
        }

        match has_audio_signature(&path) {
            Ok(true) => files.push(path),
            Ok(false) => debug!("Skipping {}: not recognised as audio", path.display()),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    files.sort_by_cached_key(|path| fold_case(&clean_title(&path.to_string_lossy())));
    debug!("Found {} audio files in {}", files.len(), dir.display());
    Ok(files)
}
