//! Real decode/output backend
//!
//! Routes each source to the compressed or sampled decoder by extension and
//! opens sinks on the configured cpal device.

use crate::audio::compressed::CompressedSession;
use crate::audio::output::DeviceSink;
use crate::audio::sampled::SampledSession;
use crate::audio::session::{AudioBackend, DecodeSession, OutputSink};
use crate::audio::types::{BackendKind, PcmFormat};
use crate::error::Result;
use looptune_common::config::PlaybackConfig;
use std::path::Path;
use tracing::info;

pub struct SystemBackend {
    device: Option<String>,
    buffer_frames: usize,
    scan_unknown_duration: bool,
}

impl SystemBackend {
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            device: config.device.clone(),
            buffer_frames: config.buffer_frames,
            scan_unknown_duration: config.scan_unknown_duration,
        }
    }
}

impl AudioBackend for SystemBackend {
    fn open_session(&mut self, source: &Path) -> Result<Box<dyn DecodeSession>> {
        let kind = BackendKind::for_source(source);
        info!("Opening {} with {} backend", source.display(), kind);
        Ok(match kind {
            BackendKind::Compressed => {
                Box::new(CompressedSession::open(source, self.scan_unknown_duration)?)
            }
            BackendKind::Sampled => Box::new(SampledSession::open(source)?),
        })
    }

    fn open_sink(&mut self, format: PcmFormat) -> Result<Box<dyn OutputSink>> {
        let sink = DeviceSink::open(format, self.device.as_deref(), self.buffer_frames)?;
        Ok(Box::new(sink))
    }
}
