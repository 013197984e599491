//! Generic sampled-audio backend (WAV, FLAC, OGG, ...)
//!
//! Length always comes from the container header and seeks are sample
//! accurate.

use crate::audio::session::DecodeSession;
use crate::audio::source::SourceReader;
use crate::audio::types::{DecodeEvent, PcmFormat};
use crate::error::{Error, Result};
use std::path::Path;
use symphonia::core::formats::SeekMode;

pub struct SampledSession {
    source: SourceReader,
    total: u64,
}

impl SampledSession {
    /// Open a sampled source; a header without a frame count is rejected
    pub fn open(path: &Path) -> Result<Self> {
        let source = SourceReader::open(path)?;
        let total = source.total().ok_or_else(|| Error::BackendOpen {
            path: path.to_path_buf(),
            reason: "frame count missing from header".to_string(),
        })?;
        Ok(Self { source, total })
    }
}

impl DecodeSession for SampledSession {
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
        Some(self.total)
    }

    fn seek_to_frame(&mut self, frame: u64) -> Result<u64> {
        self.source.seek(frame, SeekMode::Accurate)
    }

    fn close(&mut self) {
        self.source.close();
    }
}
