//! Compressed-audio backend (MP3)
//!
//! Frame-indexed seeking, possibly unknown length, and mid-stream format
//! changes reported as events rather than errors.

use crate::audio::session::DecodeSession;
use crate::audio::source::SourceReader;
use crate::audio::types::{DecodeEvent, PcmFormat};
use crate::error::Result;
use std::path::Path;
use symphonia::core::formats::SeekMode;
use tracing::{info, warn};

pub struct CompressedSession {
    source: SourceReader,
}

impl CompressedSession {
    /// Open a compressed source.
    ///
    /// When the container does not declare a length and `scan_unknown_duration`
    /// is set, every packet is read once to measure it.
    pub fn open(path: &Path, scan_unknown_duration: bool) -> Result<Self> {
        let mut source = SourceReader::open(path)?;

        if source.total().is_none() && scan_unknown_duration {
            let total = source.scan_total()?;
            match total {
                Some(frames) => info!("Measured length of {}: {} frames", path.display(), frames),
                None => warn!("Length of {} unknown; progress will not be shown", path.display()),
            }
            source.set_total(total);
        }

        Ok(Self { source })
    }
}

impl DecodeSession for CompressedSession {
    fn format(&self) -> PcmFormat {
        self.source.format()
    }

    fn read_next(&mut self) -> Result<DecodeEvent> {
        self.source.read_next()
    }

    fn position_frames(&self) -> u64 {
        self.source.position()
    }

    fn total_frames(&self) -> Option<u64> {
        self.source.total()
    }

    fn seek_to_frame(&mut self, frame: u64) -> Result<u64> {
        self.source.seek(frame, SeekMode::Coarse)
    }

    fn close(&mut self) {
        self.source.close();
    }
}
