//! Symphonia-backed source reader
//!
//! Shared plumbing for both decode backends: probing, packet decoding,
//! format-change detection and seeking. The backends decide how seeking and
//! unknown durations are handled.
//!
//! Timestamps are used directly as frame indices. That holds for the
//! containers the player supports, whose track time base is one tick per
//! sample frame.

use crate::audio::convert::Interleaver;
use crate::audio::types::{DecodeEvent, PcmFormat};
use crate::error::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Open reader/decoder pair; dropped on close
struct Codec {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
}

pub(crate) struct SourceReader {
    path: PathBuf,
    codec: Option<Codec>,

    /// Layout fixed at open; every delivered buffer uses it
    format: PcmFormat,

    /// Layout the decoder is currently producing
    stream_format: PcmFormat,

    position: u64,
    total: Option<u64>,

    /// Frames still to discard after an accurate seek
    skip_frames: u64,

    /// Samples held back while a format change is reported
    pending: Option<Vec<i16>>,

    interleaver: Interleaver,
}

impl SourceReader {
    /// Probe a file and build a decoder for its default track
    pub fn open(path: &Path) -> Result<Self> {
        let open_error = |reason: String| Error::BackendOpen {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| open_error(e.to_string()))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| open_error(format!("unsupported format: {}", e)))?;
        let reader = probed.format;

        let track = reader
            .default_track()
            .ok_or_else(|| open_error("no audio track found".to_string()))?;
        let track_id = track.id;
        let params = track.codec_params.clone();

        let sample_rate = params
            .sample_rate
            .ok_or_else(|| open_error("sample rate not declared".to_string()))?;
        let channels = params
            .channels
            .map(|c| c.count() as u16)
            .ok_or_else(|| open_error("channel layout not declared".to_string()))?;

        let decoder = symphonia::default::get_codecs()
            .make(&params, &DecoderOptions::default())
            .map_err(|e| open_error(format!("unsupported codec: {}", e)))?;

        let format = PcmFormat::new(sample_rate, channels);
        debug!(
            "Opened {} ({}, {} frames)",
            path.display(),
            format,
            params
                .n_frames
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );

        Ok(Self {
            path: path.to_path_buf(),
            codec: Some(Codec {
                reader,
                decoder,
                track_id,
            }),
            format,
            stream_format: format,
            position: 0,
            total: params.n_frames,
            skip_frames: 0,
            pending: None,
            interleaver: Interleaver::new(),
        })
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn set_total(&mut self, total: Option<u64>) {
        self.total = total;
    }

    fn codec_mut(&mut self) -> Result<&mut Codec> {
        self.codec
            .as_mut()
            .ok_or_else(|| Error::Decode(format!("{} is closed", self.path.display())))
    }

    /// Decode until one buffer of samples (or a terminal event) is available
    pub fn read_next(&mut self) -> Result<DecodeEvent> {
        if let Some(samples) = self.pending.take() {
            return Ok(DecodeEvent::Frames(samples));
        }

        let out_channels = self.format.channels;

        let path = &self.path;
        loop {
            // Field borrows keep the codec and interleaver independently usable
            let codec = self
                .codec
                .as_mut()
                .ok_or_else(|| Error::Decode(format!("{} is closed", path.display())))?;

            let packet = match codec.reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    debug!("End of stream: {}", path.display());
                    return Ok(DecodeEvent::Exhausted);
                }
                Err(SymphoniaError::ResetRequired) => {
                    Self::rebuild_decoder(codec, path)?;
                    continue;
                }
                Err(e) => {
                    return Err(Error::Decode(format!("{}: {}", path.display(), e)));
                }
            };

            if packet.track_id() != codec.track_id {
                continue;
            }

            let packet_ts = packet.ts();
            let decoded = match codec.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(msg)) => {
                    warn!("Skipping undecodable packet in {}: {}", path.display(), msg);
                    continue;
                }
                Err(e) => {
                    return Err(Error::Decode(format!("{}: {}", path.display(), e)));
                }
            };

            let frames = decoded.frames() as u64;
            if frames == 0 {
                continue;
            }

            let spec = *decoded.spec();
            let mut samples = self.interleaver.interleave(decoded, out_channels);
            self.position = packet_ts + frames;

            if self.skip_frames > 0 {
                let skip = self.skip_frames.min(frames);
                self.skip_frames -= skip;
                let drop_samples = (skip as usize * out_channels as usize).min(samples.len());
                samples.drain(..drop_samples);
                if samples.is_empty() {
                    continue;
                }
            }

            let decoded_format = PcmFormat::new(spec.rate, spec.channels.count() as u16);
            if decoded_format != self.stream_format {
                warn!(
                    "Format change in {}: {} -> {} (output stays {})",
                    path.display(),
                    self.stream_format,
                    decoded_format,
                    self.format
                );
                self.stream_format = decoded_format;
                self.pending = Some(samples);
                return Ok(DecodeEvent::FormatChanged(decoded_format));
            }

            return Ok(DecodeEvent::Frames(samples));
        }
    }

    /// Replace the decoder after the reader reports a stream reset
    fn rebuild_decoder(codec: &mut Codec, path: &Path) -> Result<()> {
        let track = codec
            .reader
            .default_track()
            .ok_or_else(|| Error::Decode(format!("{}: track vanished after reset", path.display())))?;
        codec.track_id = track.id;
        codec.decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| Error::Decode(format!("{}: {}", path.display(), e)))?;
        debug!("Decoder rebuilt after stream reset: {}", path.display());
        Ok(())
    }

    /// Seek to an absolute frame.
    ///
    /// Coarse seeks land wherever the container allows. Accurate seeks
    /// discard the overshoot so playback resumes at exactly `frame`.
    pub fn seek(&mut self, frame: u64, mode: SeekMode) -> Result<u64> {
        let path = self.path.clone();
        let codec = self.codec_mut()?;

        let seeked = codec
            .reader
            .seek(
                mode,
                SeekTo::TimeStamp {
                    ts: frame,
                    track_id: codec.track_id,
                },
            )
            .map_err(|e| Error::Decode(format!("{}: seek failed: {}", path.display(), e)))?;
        codec.decoder.reset();

        self.pending = None;
        match mode {
            SeekMode::Accurate => {
                self.skip_frames = seeked.required_ts.saturating_sub(seeked.actual_ts);
                self.position = seeked.required_ts;
            }
            SeekMode::Coarse => {
                self.skip_frames = 0;
                self.position = seeked.actual_ts;
            }
        }
        Ok(self.position)
    }

    /// Walk every packet to find the stream length, then rewind.
    ///
    /// A failed scan leaves the length unknown. A failed rewind is an error
    /// because the reader would no longer be at the start.
    pub fn scan_total(&mut self) -> Result<Option<u64>> {
        let path = self.path.clone();
        let codec = self.codec_mut()?;

        let mut end = 0u64;
        let scanned = loop {
            match codec.reader.next_packet() {
                Ok(packet) => {
                    if packet.track_id() == codec.track_id {
                        end = end.max(packet.ts() + packet.dur());
                    }
                }
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break Some(end);
                }
                Err(e) => {
                    warn!("Length scan of {} failed: {}", path.display(), e);
                    break None;
                }
            }
        };

        self.seek(0, SeekMode::Accurate).map_err(|e| Error::BackendOpen {
            path: path.clone(),
            reason: format!("cannot rewind after length scan: {}", e),
        })?;
        self.position = 0;

        Ok(scanned)
    }

    /// Drop the reader and decoder
    pub fn close(&mut self) {
        if self.codec.take().is_some() {
            self.pending = None;
            debug!("Closed decoder: {}", self.path.display());
        }
    }
}
