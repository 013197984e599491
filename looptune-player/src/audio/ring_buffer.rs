//! Lock-free sample ring between the writer and the device callback
//!
//! Single producer (the playback loop, via [`DeviceSink`](super::DeviceSink))
//! and single consumer (the cpal output callback). Neither side takes a lock,
//! so the real-time callback never waits on the playback loop.

use ringbuf::{traits::*, HeapRb};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Interleaved `i16` sample ring
pub struct SampleRing {
    buffer: HeapRb<i16>,

    /// Callback found fewer samples than it needed
    underruns: Arc<AtomicU64>,
}

impl SampleRing {
    /// Create a ring holding `capacity` samples (not frames)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        debug!("Creating sample ring with capacity: {} samples", capacity);
        Self {
            buffer: HeapRb::new(capacity),
            underruns: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Split into the writer half and the callback half
    pub fn split(self) -> (SampleProducer, SampleConsumer) {
        let (producer, consumer) = self.buffer.split();
        (
            SampleProducer {
                producer,
                underruns: Arc::clone(&self.underruns),
            },
            SampleConsumer {
                consumer,
                underruns: self.underruns,
            },
        )
    }
}

/// Writer half
pub struct SampleProducer {
    producer: ringbuf::HeapProd<i16>,
    underruns: Arc<AtomicU64>,
}

impl SampleProducer {
    /// Push as many samples as fit; returns how many were taken
    pub fn push_slice(&mut self, samples: &[i16]) -> usize {
        self.producer.push_slice(samples)
    }

    pub fn occupied_len(&self) -> usize {
        self.producer.occupied_len()
    }

    pub fn capacity(&self) -> usize {
        self.producer.capacity().into()
    }

    pub fn is_empty(&self) -> bool {
        self.producer.is_empty()
    }

    /// Underruns seen by the callback so far
    pub fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }
}

/// Callback half
pub struct SampleConsumer {
    consumer: ringbuf::HeapCons<i16>,
    underruns: Arc<AtomicU64>,
}

impl SampleConsumer {
    /// Fill `out` from the ring; returns how many samples were available.
    ///
    /// A short read counts as an underrun; the caller fills the rest with
    /// silence.
    pub fn pop_into(&mut self, out: &mut [i16]) -> usize {
        let got = self.consumer.pop_slice(out);
        if got < out.len() {
            self.underruns.fetch_add(1, Ordering::Relaxed);
        }
        got
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let (mut producer, _consumer) = SampleRing::new(4).split();
        assert_eq!(producer.push_slice(&[1, 2, 3]), 3);
        assert_eq!(producer.push_slice(&[4, 5, 6]), 1);
        assert_eq!(producer.occupied_len(), 4);
        assert_eq!(producer.capacity(), 4);
    }

    #[test]
    fn test_pop_in_order_and_count_underrun() {
        let (mut producer, mut consumer) = SampleRing::new(8).split();
        producer.push_slice(&[7, 8, 9]);

        let mut out = [0i16; 2];
        assert_eq!(consumer.pop_into(&mut out), 2);
        assert_eq!(out, [7, 8]);
        assert_eq!(producer.underruns(), 0);

        let mut out = [0i16; 4];
        assert_eq!(consumer.pop_into(&mut out), 1);
        assert_eq!(out[0], 9);
        assert_eq!(producer.underruns(), 1);
        assert!(producer.is_empty());
    }
}
