//! Sample conversion helpers
//!
//! Turns symphonia's planar decode buffers into interleaved `i16`, and
//! remaps channel layouts when a stream changes shape mid-decode.

use symphonia::core::audio::{AudioBufferRef, SampleBuffer, SignalSpec};

/// Reusable planar-to-interleaved `i16` converter
#[derive(Default)]
pub struct Interleaver {
    buffer: Option<SampleBuffer<i16>>,
    spec: Option<SignalSpec>,
    frames: usize,
}

impl Interleaver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interleave a decoded buffer into `out_channels` channels
    pub fn interleave(&mut self, decoded: AudioBufferRef<'_>, out_channels: u16) -> Vec<i16> {
        let spec = *decoded.spec();
        let capacity = decoded.capacity();
        let source_channels = spec.channels.count();

        // Rebuild the scratch buffer when the layout changes or a bigger packet arrives
        if self.spec != Some(spec) || capacity > self.frames || self.buffer.is_none() {
            self.buffer = Some(SampleBuffer::<i16>::new(capacity as u64, spec));
            self.spec = Some(spec);
            self.frames = capacity;
        }

        let samples = match self.buffer.as_mut() {
            Some(buffer) => {
                buffer.copy_interleaved_ref(decoded);
                buffer.samples()
            }
            None => &[],
        };

        remap_channels(samples, source_channels, out_channels as usize)
    }
}

/// Convert interleaved samples between channel counts.
///
/// - Same count: copied unchanged
/// - Fewer inputs (e.g. mono to stereo): input channels are repeated
/// - More inputs (e.g. 5.1 to stereo): each output averages every input
///   channel that maps onto it (`input % out == output`)
pub fn remap_channels(samples: &[i16], from: usize, to: usize) -> Vec<i16> {
    if from == to || from == 0 || to == 0 {
        return samples.to_vec();
    }

    let frames = samples.len() / from;
    let mut out = Vec::with_capacity(frames * to);

    for frame in samples.chunks_exact(from) {
        if from < to {
            for ch in 0..to {
                out.push(frame[ch % from]);
            }
        } else {
            for ch in 0..to {
                let mut sum = 0i32;
                let mut count = 0i32;
                for (idx, &sample) in frame.iter().enumerate() {
                    if idx % to == ch {
                        sum += sample as i32;
                        count += 1;
                    }
                }
                out.push((sum / count.max(1)) as i16);
            }
        }
    }

    out
}
