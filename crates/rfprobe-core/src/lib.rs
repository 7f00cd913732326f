//! # rfprobe Core DSP Library
//!
//! Pure signal-processing building blocks for driving an SDR transceiver as
//! a tone source and signal-level probe:
//!
//! - **Tone Generation**: chunked, phase-continuous complex oscillator
//! - **RSSI Estimation**: calibrated dBm traces with anti-aliased decimation
//! - **Noise Injection**: AWGN at a target SNR for hardware-free testing
//!
//! Nothing in this crate touches a device; streaming sessions live in
//! `rfprobe-sdr` and feed these blocks.
//!
//! ## Signal Flow
//!
//! ```text
//! TX: ChunkOscillator → chunk → device write (rfprobe-sdr)
//! RX: device reads → flatten → DC removal → estimate() → dBm trace
//! ```

pub mod channel;
pub mod decimation;
pub mod oscillator;
pub mod rssi;
pub mod types;

pub use channel::NoiseChannel;
pub use decimation::DecimatingFir;
pub use oscillator::ChunkOscillator;
pub use rssi::{estimate, CalibrationParams};
pub use types::{Complex, DspError, DspResult, IQBuffer, IQSample, Sample};
