//! Radio device capability interface
//!
//! The narrow surface the streaming sessions need from a driver: tuner-style
//! setters/getters per direction, and stream handles with an
//! activate/read-write/deactivate lifecycle. Anything vendor-specific
//! (discovery, transport, buffering strategy) stays behind these traits.
//!
//! Setters return the value the hardware actually applied, which may differ
//! from the request. Closing a stream is dropping it; a driver releases its
//! underlying handle in `Drop` so every exit path releases exactly once.

use rfprobe_core::types::IQSample;

/// Stream direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Receive path
    Rx,
    /// Transmit path
    Tx,
}

/// Wire sample format requested when opening a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFormat {
    /// 32-bit float I/Q pairs (our native format)
    #[default]
    Cf32,
}

/// Result type for device operations
pub type SdrResult<T> = Result<T, SdrError>;

/// Errors that can occur during device operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum SdrError {
    #[error("stream desynchronized: submitted {submitted} samples, device consumed {written}")]
    WriteDesync { submitted: usize, written: usize },

    #[error("receive stream stalled: chunk {chunk} still short after {attempts} read attempts")]
    StreamStalled { chunk: usize, attempts: usize },

    #[error("hardware error: {0}")]
    Hardware(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("stream not active")]
    NotActive,
}

/// Tuner and stream-factory surface of an SDR.
pub trait RadioDevice: Send {
    /// Set the sample rate for one direction. Returns the applied rate.
    fn set_sample_rate(&mut self, direction: Direction, rate: f64) -> SdrResult<f64>;

    /// Current sample rate for one direction.
    fn sample_rate(&self, direction: Direction) -> f64;

    /// Set the center frequency for one direction. Returns the applied value.
    fn set_frequency(&mut self, direction: Direction, freq_hz: f64) -> SdrResult<f64>;

    /// Current center frequency for one direction.
    fn frequency(&self, direction: Direction) -> f64;

    /// Set the analog bandwidth for one direction. Returns the applied value.
    fn set_bandwidth(&mut self, direction: Direction, bw_hz: f64) -> SdrResult<f64>;

    /// Current analog bandwidth for one direction.
    fn bandwidth(&self, direction: Direction) -> f64;

    /// Set one named gain stage (e.g. "LNA", "VGA1"). Returns the applied value.
    fn set_gain(&mut self, direction: Direction, stage: &str, gain_db: f64) -> SdrResult<f64>;

    /// Current gain of one named stage.
    fn gain(&self, direction: Direction, stage: &str) -> f64;

    /// Open a receive stream in the given wire format.
    fn open_rx_stream(&mut self, format: SampleFormat) -> SdrResult<Box<dyn RxStream>>;

    /// Open a transmit stream in the given wire format.
    fn open_tx_stream(&mut self, format: SampleFormat) -> SdrResult<Box<dyn TxStream>>;
}

/// Receive half of a stream.
pub trait RxStream: Send {
    /// Start the stream.
    fn activate(&mut self) -> SdrResult<()>;

    /// Stop the stream.
    fn deactivate(&mut self) -> SdrResult<()>;

    /// Blocking read into `buffer`. Returns the number of samples actually
    /// delivered, which may be anything from zero up to `buffer.len()`.
    fn read(&mut self, buffer: &mut [IQSample]) -> SdrResult<usize>;

    /// Preferred transfer size in samples.
    fn mtu(&self) -> usize;
}

/// Transmit half of a stream.
pub trait TxStream: Send {
    /// Start the stream.
    fn activate(&mut self) -> SdrResult<()>;

    /// Stop the stream.
    fn deactivate(&mut self) -> SdrResult<()>;

    /// Blocking write. Returns the number of samples the device consumed.
    fn write(&mut self, samples: &[IQSample]) -> SdrResult<usize>;

    /// Preferred transfer size in samples.
    fn mtu(&self) -> usize;
}
