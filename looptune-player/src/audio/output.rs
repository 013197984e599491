//! Audio output using cpal
//!
//! [`DeviceSink`] turns cpal's callback-driven stream into the blocking
//! [`OutputSink`] the playback loop expects. Writes go into a lock-free ring;
//! the device callback drains it and plays silence whenever it runs dry.

use crate::audio::ring_buffer::{SampleConsumer, SampleProducer, SampleRing};
use crate::audio::session::OutputSink;
use crate::audio::types::PcmFormat;
use crate::error::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Sleep between attempts while the ring is full or draining
const WAIT_STEP: Duration = Duration::from_millis(5);

/// Period assumed when the device does not report a fixed buffer size
const DEFAULT_PERIOD_FRAMES: u32 = 1024;

/// Output device as shown by the `devices` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDevice {
    pub name: String,
    /// Device cpal uses when no name is configured
    pub is_default: bool,
}

/// Blocking PCM sink on a cpal output device
pub struct DeviceSink {
    format: PcmFormat,
    producer: SampleProducer,
    stream: Option<Stream>,

    /// Set by the stream error callback
    error_flag: Arc<AtomicBool>,

    /// One device period, waited out after the ring empties on drain
    period: Duration,
}

impl DeviceSink {
    /// Output devices on the default host, for picking `playback.device`
    pub fn list_devices() -> Result<Vec<OutputDevice>> {
        let host = cpal::default_host();
        let default_name = host.default_output_device().and_then(|d| d.name().ok());
        let devices = host
            .output_devices()
            .map_err(|e| Error::AudioOutput(format!("Cannot list output devices: {}", e)))?;

        let listed: Vec<OutputDevice> = devices
            .filter_map(|device| device.name().ok())
            .map(|name| OutputDevice {
                is_default: default_name.as_deref() == Some(name.as_str()),
                name,
            })
            .collect();
        debug!("{} output devices on {:?}", listed.len(), host.id());
        Ok(listed)
    }

    /// Open a device for exactly `format` and start the stream.
    ///
    /// `device_name` picks a device by name and falls back to the default
    /// device when no device has that name. `buffer_frames` sizes the ring
    /// (twice this many frames are buffered).
    pub fn open(format: PcmFormat, device_name: Option<&str>, buffer_frames: usize) -> Result<Self> {
        let device = Self::select_device(device_name)?;
        let (config, sample_format) = Self::matching_config(&device, format)?;

        let period_frames = match config.buffer_size {
            cpal::BufferSize::Fixed(size) => size,
            cpal::BufferSize::Default => DEFAULT_PERIOD_FRAMES,
        };
        let period = Duration::from_secs_f64(period_frames as f64 / format.sample_rate.max(1) as f64);

        let ring = SampleRing::new(format.samples_for_frames(buffer_frames.max(1) * 2));
        let (producer, consumer) = ring.split();
        let error_flag = Arc::new(AtomicBool::new(false));

        debug!(
            "Output config: sample_rate={}, channels={}, format={:?}",
            config.sample_rate.0, config.channels, sample_format
        );

        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(
                &device,
                &config,
                consumer,
                Arc::clone(&error_flag),
                |s| s as f32 / 32768.0,
            )?,
            SampleFormat::I16 => Self::build_stream::<i16>(
                &device,
                &config,
                consumer,
                Arc::clone(&error_flag),
                |s| s,
            )?,
            SampleFormat::U16 => Self::build_stream::<u16>(
                &device,
                &config,
                consumer,
                Arc::clone(&error_flag),
                |s| (s as i32 + 32768) as u16,
            )?,
            other => {
                return Err(Error::AudioOutput(format!(
                    "Unsupported sample format: {:?}",
                    other
                )));
            }
        };

        stream
            .play()
            .map_err(|e| Error::AudioOutput(format!("Failed to start stream: {}", e)))?;

        info!("Output stream started ({})", format);
        Ok(Self {
            format,
            producer,
            stream: Some(stream),
            error_flag,
            period,
        })
    }

    fn select_device(device_name: Option<&str>) -> Result<Device> {
        let host = cpal::default_host();

        if let Some(name) = device_name {
            let mut devices = host
                .output_devices()
                .map_err(|e| Error::AudioOutput(format!("Failed to enumerate devices: {}", e)))?;

            if let Some(device) = devices.find(|d| d.name().ok().as_deref() == Some(name)) {
                info!("Using requested audio device: {}", name);
                return Ok(device);
            }
            warn!("Requested device '{}' not found, falling back to default device", name);
        }

        let device = host
            .default_output_device()
            .ok_or_else(|| Error::AudioOutput("No default output device found".to_string()))?;
        debug!(
            "Using default audio device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );
        Ok(device)
    }

    /// Find a device configuration with exactly the session's rate and channels.
    ///
    /// Prefers f32, then i16, then u16 sample storage.
    fn matching_config(device: &Device, format: PcmFormat) -> Result<(StreamConfig, SampleFormat)> {
        let supported: Vec<_> = device
            .supported_output_configs()
            .map_err(|e| Error::AudioOutput(format!("Failed to get device configs: {}", e)))?
            .filter(|config| {
                config.channels() == format.channels
                    && config.min_sample_rate().0 <= format.sample_rate
                    && config.max_sample_rate().0 >= format.sample_rate
            })
            .collect();

        for wanted in [SampleFormat::F32, SampleFormat::I16, SampleFormat::U16] {
            if let Some(config) = supported.iter().find(|c| c.sample_format() == wanted) {
                let config = config
                    .clone()
                    .with_sample_rate(cpal::SampleRate(format.sample_rate));
                return Ok((config.config(), wanted));
            }
        }

        Err(Error::AudioOutput(format!(
            "Device cannot play {} audio",
            format
        )))
    }

    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        mut consumer: SampleConsumer,
        error_flag: Arc<AtomicBool>,
        convert: fn(i16) -> T,
    ) -> Result<Stream>
    where
        T: SizedSample + Send + 'static,
    {
        let silence = convert(0);
        let mut scratch: Vec<i16> = Vec::new();

        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    if scratch.len() < data.len() {
                        scratch.resize(data.len(), 0);
                    }
                    let got = consumer.pop_into(&mut scratch[..data.len()]);
                    for (out, &sample) in data.iter_mut().zip(&scratch[..got]) {
                        *out = convert(sample);
                    }
                    for out in &mut data[got..] {
                        *out = silence;
                    }
                },
                move |err| {
                    error!("Audio stream error: {}", err);
                    error_flag.store(true, Ordering::SeqCst);
                },
                None,
            )
            .map_err(|e| Error::AudioOutput(format!("Failed to build stream: {}", e)))
    }

    fn check_open(&self) -> Result<()> {
        if self.stream.is_none() {
            return Err(Error::AudioOutput("output sink is closed".to_string()));
        }
        if self.error_flag.load(Ordering::SeqCst) {
            return Err(Error::AudioOutput("audio device reported a stream error".to_string()));
        }
        Ok(())
    }
}

impl OutputSink for DeviceSink {
    fn write(&mut self, samples: &[i16]) -> Result<()> {
        let mut rest = samples;
        while !rest.is_empty() {
            self.check_open()?;
            let pushed = self.producer.push_slice(rest);
            rest = &rest[pushed..];
            if !rest.is_empty() {
                thread::sleep(WAIT_STEP);
            }
        }
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        while !self.producer.is_empty() {
            self.check_open()?;
            thread::sleep(WAIT_STEP);
        }
        thread::sleep(self.period);
        debug!("Output drained ({} underruns)", self.producer.underruns());
        Ok(())
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                warn!("Failed to pause stream: {}", e);
            }
            drop(stream);
            info!("Output stream closed ({})", self.format);
        }
    }
}

impl Drop for DeviceSink {
    fn drop(&mut self) {
        self.close();
    }
}
