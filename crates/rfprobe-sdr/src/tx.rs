//! Transmit streaming session
//!
//! Runs a phase-continuous tone out of a transmit stream on a dedicated
//! worker thread: produce one oscillator chunk, write it, repeat until
//! stopped. The stop request is observed between chunks, so worst-case
//! cancellation latency is one chunk's write duration.
//!
//! A write that consumes fewer samples than submitted means the device lost
//! stream alignment; resuming would splice a phase step into the carrier, so
//! the session treats it as fatal and terminates instead of retrying.

use crate::device::{Direction, RadioDevice, SampleFormat, SdrError, SdrResult, TxStream};
use rfprobe_core::oscillator::ChunkOscillator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Tone transmitter session.
///
/// Owns one transmit stream and the oscillator that feeds it. The stream
/// handle is moved into the worker on `start()` and released there exactly
/// once, on every exit path. `start()` on an active session and `stop()` on
/// an inactive one are no-ops, so best-effort teardown is always safe.
pub struct ToneTransmitter {
    /// Stream and oscillator, present until the session has started.
    idle: Option<(Box<dyn TxStream>, ChunkOscillator)>,
    worker: Option<JoinHandle<SdrResult<()>>>,
    stop_flag: Arc<AtomicBool>,
}

impl ToneTransmitter {
    /// Create a session from an already-opened stream and oscillator.
    pub fn new(stream: Box<dyn TxStream>, oscillator: ChunkOscillator) -> Self {
        Self {
            idle: Some((stream, oscillator)),
            worker: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Open a transmit stream on `device` and build the oscillator from the
    /// device's TX sample rate and the stream's preferred transfer size.
    pub fn from_device(
        device: &mut dyn RadioDevice,
        tone_frequency: f64,
        amplitude: f64,
    ) -> SdrResult<Self> {
        let stream = device.open_tx_stream(SampleFormat::Cf32)?;
        let rate = device.sample_rate(Direction::Tx);
        let oscillator = ChunkOscillator::new(tone_frequency, rate, amplitude, stream.mtu());
        Ok(Self::new(stream, oscillator))
    }

    /// Activate the stream and start the generate-and-write loop.
    ///
    /// No-op if the session is already active or has already stopped.
    pub fn start(&mut self) -> SdrResult<()> {
        if self.worker.is_some() {
            return Ok(());
        }
        let (mut stream, mut oscillator) = match self.idle.take() {
            Some(parts) => parts,
            None => return Ok(()),
        };

        if let Err(e) = stream.activate() {
            self.idle = Some((stream, oscillator));
            return Err(e);
        }

        self.stop_flag.store(false, Ordering::Relaxed);
        let stop_flag = Arc::clone(&self.stop_flag);

        let handle = thread::Builder::new()
            .name("rfprobe-tx".to_string())
            .spawn(move || {
                tracing::info!(
                    "tone transmitter started: {} samples/chunk",
                    oscillator.chunk_size()
                );
                let result = run_loop(stream.as_mut(), &mut oscillator, &stop_flag);
                if let Err(e) = stream.deactivate() {
                    tracing::warn!("TX stream deactivate failed: {e}");
                }
                match &result {
                    Ok(()) => tracing::info!("tone transmitter stopped"),
                    Err(e) => tracing::error!("tone transmitter terminated: {e}"),
                }
                result
                // stream dropped here: handle released exactly once
            })
            .map_err(|e| SdrError::Hardware(format!("failed to spawn TX worker: {e}")))?;

        self.worker = Some(handle);
        Ok(())
    }

    /// Signal the loop to exit and block until the worker has deactivated
    /// and released the stream.
    ///
    /// Returns the error that terminated the loop, if any. No-op when the
    /// session is not active.
    pub fn stop(&mut self) -> SdrResult<()> {
        self.stop_flag.store(true, Ordering::Relaxed);
        match self.worker.take() {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|_| Err(SdrError::Hardware("TX worker panicked".to_string()))),
            None => Ok(()),
        }
    }

    /// Whether the worker loop is still running.
    pub fn is_active(&self) -> bool {
        self.worker
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for ToneTransmitter {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

fn run_loop(
    stream: &mut dyn TxStream,
    oscillator: &mut ChunkOscillator,
    stop_flag: &AtomicBool,
) -> SdrResult<()> {
    while !stop_flag.load(Ordering::Relaxed) {
        let chunk = oscillator.produce_chunk();
        let written = stream.write(&chunk)?;
        if written != chunk.len() {
            return Err(SdrError::WriteDesync {
                submitted: chunk.len(),
                written,
            });
        }
    }
    Ok(())
}
