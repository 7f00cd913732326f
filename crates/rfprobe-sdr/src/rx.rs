//! Receive streaming session
//!
//! Duration-bounded, chunked blocking acquisition: the stream is activated,
//! each chunk slot is filled by re-issuing a full-chunk read until the
//! device delivers exactly one chunk, and the flattened capture is
//! DC-corrected before being returned.
//!
//! Short reads are transient (the device had nothing ready) and are retried
//! with no backoff, but the retry count per chunk is bounded so a stalled
//! device surfaces as an error instead of hanging the caller forever.

use crate::device::{Direction, RadioDevice, RxStream, SampleFormat, SdrError, SdrResult};
use rfprobe_core::types::{complex_ops, IQBuffer, IQSample};
use std::time::Duration;

/// Default bound on consecutive short reads per chunk slot.
pub const DEFAULT_MAX_READ_RETRIES: usize = 1000;

/// Receive acquisition session.
///
/// Owns one receive stream for its lifetime; the underlying handle is
/// released when the session is dropped.
pub struct SampleAcquirer {
    stream: Box<dyn RxStream>,
    sample_rate: f64,
    chunk_size: usize,
    max_read_retries: usize,
}

impl SampleAcquirer {
    /// Create a session over an already-opened stream. The chunk size
    /// defaults to the stream's preferred transfer size.
    pub fn new(stream: Box<dyn RxStream>, sample_rate: f64) -> Self {
        let chunk_size = stream.mtu().max(1);
        Self {
            stream,
            sample_rate,
            chunk_size,
            max_read_retries: DEFAULT_MAX_READ_RETRIES,
        }
    }

    /// Open a receive stream on `device`, using the device's RX sample rate.
    pub fn from_device(device: &mut dyn RadioDevice) -> SdrResult<Self> {
        let stream = device.open_rx_stream(SampleFormat::Cf32)?;
        let rate = device.sample_rate(Direction::Rx);
        Ok(Self::new(stream, rate))
    }

    /// Override the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Override the per-chunk retry bound.
    pub fn with_max_read_retries(mut self, retries: usize) -> Self {
        self.max_read_retries = retries.max(1);
        self
    }

    /// Acquire `duration` worth of samples as whole chunks.
    ///
    /// Returns `floor(duration · rate / chunk_size) · chunk_size` samples in
    /// acquisition order with the arithmetic mean of the whole capture
    /// subtracted. A duration shorter than one chunk yields an empty buffer,
    /// which is a valid (degenerate) acquisition, not an error.
    pub fn acquire(&mut self, duration: Duration) -> SdrResult<IQBuffer> {
        // Rounding at the sample level keeps decimal durations (e.g. 4 µs at
        // 1 MS/s) from landing a hair under a chunk boundary.
        let total_samples = (duration.as_secs_f64() * self.sample_rate).round() as usize;
        let chunks = total_samples / self.chunk_size;

        self.stream.activate()?;
        let filled = self.fill_chunks(chunks);
        let deactivated = self.stream.deactivate();

        let mut samples = filled?;
        deactivated?;

        complex_ops::subtract_mean(&mut samples);
        tracing::debug!(
            "acquired {} samples ({} chunks of {})",
            samples.len(),
            chunks,
            self.chunk_size
        );
        Ok(samples)
    }

    /// Fill `chunks` consecutive slots, each with exactly one full chunk.
    fn fill_chunks(&mut self, chunks: usize) -> SdrResult<IQBuffer> {
        let mut samples = vec![IQSample::new(0.0, 0.0); chunks * self.chunk_size];

        for chunk_idx in 0..chunks {
            let slot = &mut samples[chunk_idx * self.chunk_size..(chunk_idx + 1) * self.chunk_size];
            let mut attempts = 0;
            loop {
                let n = self.stream.read(slot)?;
                if n == self.chunk_size {
                    break;
                }
                // Short read: discard and re-issue the whole chunk
                attempts += 1;
                if attempts >= self.max_read_retries {
                    return Err(SdrError::StreamStalled {
                        chunk: chunk_idx,
                        attempts,
                    });
                }
            }
        }

        Ok(samples)
    }

    /// Configured chunk size in samples.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}
