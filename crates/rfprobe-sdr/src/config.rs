//! Caller-owned radio configuration
//!
//! All device-wide settings live in one explicit struct the caller owns and
//! pushes to a device between streaming operations; there is no ambient
//! radio state. Gain stages and the RX/TX synthesizer offset are data, not
//! hard-coded behavior, because measured values differ per board and setup.

use crate::device::{Direction, RadioDevice, SdrResult};
use serde::{Deserialize, Serialize};

/// Minimum RX/TX synthesizer separation in Hz.
///
/// With both paths tuned closer than this the two PLLs start pulling each
/// other and the transmitted tone smears. Re-applied on every retune.
pub const PLL_SEPARATION_HZ: f64 = 1.5e6;

/// One named gain stage and its setting in dB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GainSetting {
    /// Stage name as the driver knows it (e.g. "LNA", "VGA1", "VGA2").
    pub stage: String,
    /// Gain in dB.
    pub db: f64,
}

impl GainSetting {
    pub fn new(stage: impl Into<String>, db: f64) -> Self {
        Self {
            stage: stage.into(),
            db,
        }
    }
}

/// Full device configuration for one tone-generation / probing setup.
///
/// `frequency` is the transmit center; the receive path sits at
/// `frequency + rx_offset_hz` so the two synthesizers keep their distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadioConfig {
    /// Transmit center frequency in Hz.
    pub frequency: f64,
    /// Sample rate in Hz, applied to both directions.
    pub sample_rate: f64,
    /// Analog bandwidth in Hz, applied to both directions.
    pub bandwidth: f64,
    /// Signed RX offset from the TX center, in Hz.
    pub rx_offset_hz: f64,
    /// Receive gain stages.
    pub rx_gains: Vec<GainSetting>,
    /// Transmit gain stages.
    pub tx_gains: Vec<GainSetting>,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            frequency: 382.5e6,
            sample_rate: 2e6,
            bandwidth: 2e6,
            rx_offset_hz: PLL_SEPARATION_HZ,
            rx_gains: vec![
                GainSetting::new("LNA", 0.0),
                GainSetting::new("VGA1", 5.0),
                GainSetting::new("VGA2", 0.0),
            ],
            tx_gains: vec![GainSetting::new("VGA1", -35.0)],
        }
    }
}

impl RadioConfig {
    /// Push the whole configuration to a device.
    pub fn apply(&self, device: &mut dyn RadioDevice) -> SdrResult<()> {
        device.set_sample_rate(Direction::Rx, self.sample_rate)?;
        device.set_sample_rate(Direction::Tx, self.sample_rate)?;
        device.set_bandwidth(Direction::Rx, self.bandwidth)?;
        device.set_bandwidth(Direction::Tx, self.bandwidth)?;

        self.tune(device)?;

        for g in &self.rx_gains {
            device.set_gain(Direction::Rx, &g.stage, g.db)?;
        }
        for g in &self.tx_gains {
            device.set_gain(Direction::Tx, &g.stage, g.db)?;
        }

        tracing::info!(
            "radio configured: {:.3} MHz TX / {:+.1} kHz RX offset, {:.1} MS/s",
            self.frequency / 1e6,
            self.rx_offset_hz / 1e3,
            self.sample_rate / 1e6
        );
        Ok(())
    }

    /// Change the center frequency and re-apply the RX offset.
    ///
    /// Must be called for every frequency change on either direction; only
    /// valid while no session of either direction is active.
    pub fn retune(&mut self, device: &mut dyn RadioDevice, frequency: f64) -> SdrResult<()> {
        self.frequency = frequency;
        self.tune(device)
    }

    fn tune(&self, device: &mut dyn RadioDevice) -> SdrResult<()> {
        device.set_frequency(Direction::Tx, self.frequency)?;
        device.set_frequency(Direction::Rx, self.frequency + self.rx_offset_hz)?;
        Ok(())
    }

    /// Sum of the configured receive gain stages in dB, for RSSI
    /// gain compensation.
    pub fn total_rx_gain(&self) -> f64 {
        self.rx_gains.iter().map(|g| g.db).sum()
    }
}
