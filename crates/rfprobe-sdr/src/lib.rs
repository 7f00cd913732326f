//! # rfprobe SDR Streaming
//!
//! Streaming sessions and the device capability interface for the rfprobe
//! tone generator / signal-level probe:
//!
//! - **Device interface**: narrow tuner + stream traits a driver implements
//! - **Configuration**: caller-owned [`RadioConfig`] with per-stage gains
//!   and the RX/TX synthesizer offset
//! - **Transmit session**: [`ToneTransmitter`], a dedicated worker thread
//!   streaming phase-continuous chunks until stopped
//! - **Receive session**: [`SampleAcquirer`], duration-bounded chunked
//!   acquisition with bounded short-read retries and DC removal
//!
//! DSP primitives (oscillator, RSSI estimation, noise channel) live in
//! `rfprobe-core`; this crate owns everything that touches a stream handle.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rfprobe_sdr::{RadioConfig, SampleAcquirer, ToneTransmitter};
//! use std::time::Duration;
//!
//! let mut config = RadioConfig::default();
//! config.apply(device.as_mut())?;
//!
//! let mut tx = ToneTransmitter::from_device(device.as_mut(), -800e3, 1.0)?;
//! tx.start()?;
//!
//! let mut rx = SampleAcquirer::from_device(device.as_mut())?;
//! let capture = rx.acquire(Duration::from_millis(50))?;
//! tx.stop()?;
//! ```

pub mod config;
pub mod device;
pub mod rx;
pub mod tx;

#[cfg(test)]
pub(crate) mod testdev;

pub use config::{GainSetting, RadioConfig, PLL_SEPARATION_HZ};
pub use device::{Direction, RadioDevice, RxStream, SampleFormat, SdrError, SdrResult, TxStream};
pub use rx::SampleAcquirer;
pub use tx::ToneTransmitter;
