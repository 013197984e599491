//! Audio test file generation
//!
//! Deterministic 16-bit PCM WAV files and silent constant-bitrate MP3 files
//! for exercising the real decode paths without shipping audio fixtures.

use hound::{WavSpec, WavWriter};
use std::f32::consts::PI;
use std::path::Path;

/// Sample rate used by generated WAV files
pub const TEST_SAMPLE_RATE: u32 = 8000;

/// Sample rate of generated MP3 files (fixed by the frame header)
pub const MP3_SAMPLE_RATE: u32 = 44_100;

/// Frames decoded from one MPEG-1 Layer III frame
pub const MP3_FRAMES_PER_PACKET: u64 = 1152;

/// MPEG-1 Layer III, no CRC, 128 kbps, 44.1 kHz, stereo, unpadded
const MP3_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x04];

/// 144 * 128000 / 44100, rounded down
const MP3_FRAME_BYTES: usize = 417;

/// Generate a silent WAV file
///
/// # Arguments
/// * `path` - Output file path
/// * `frames` - Length in sample frames
/// * `channels` - Interleaved channel count
pub fn generate_silent_wav<P: AsRef<Path>>(path: P, frames: u32, channels: u16) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels,
        sample_rate: TEST_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for _ in 0..frames as u64 * channels as u64 {
        writer.write_sample(0i16)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Generate a sine wave WAV file, same signal on every channel
///
/// `amplitude` is 0.0-1.0 of full scale.
pub fn generate_sine_wav<P: AsRef<Path>>(
    path: P,
    frames: u32,
    channels: u16,
    frequency_hz: f32,
    amplitude: f32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels,
        sample_rate: TEST_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for i in 0..frames {
        let t = i as f32 / TEST_SAMPLE_RATE as f32;
        let value = (2.0 * PI * frequency_hz * t).sin() * amplitude;
        let sample = (value * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(sample)?;
        }
    }
    writer.finalize()?;
    Ok(())
}

/// Generate a silent stereo MP3 of `packets` frames.
///
/// Every frame is the fixed header followed by zeros: empty side info and no
/// main data, which decodes to silence. There is no Xing/Info header, so the
/// length has to be measured by scanning.
pub fn generate_silent_mp3<P: AsRef<Path>>(path: P, packets: usize) -> std::io::Result<()> {
    let mut frame = vec![0u8; MP3_FRAME_BYTES];
    frame[..MP3_HEADER.len()].copy_from_slice(&MP3_HEADER);

    let mut bytes = Vec::with_capacity(MP3_FRAME_BYTES * packets);
    for _ in 0..packets {
        bytes.extend_from_slice(&frame);
    }
    std::fs::write(path, bytes)
}
