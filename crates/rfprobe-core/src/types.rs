//! Core types for IQ signal processing
//!
//! Defines the fundamental types used throughout the rfprobe DSP library,
//! particularly for representing complex I/Q (In-phase/Quadrature) samples.
//!
//! Samples cross the device boundary as CF32 pairs; all arithmetic here runs
//! in `f64` precision so long-running accumulations (phase, power averages)
//! do not pick up single-precision drift.

use num_complex::Complex64;

/// Type alias for complex numbers using f64 precision
pub type Complex = Complex64;

/// A single I/Q sample point
pub type IQSample = Complex64;

/// A floating point sample (for real-valued traces such as dBm sequences)
pub type Sample = f64;

/// A buffer of I/Q samples
pub type IQBuffer = Vec<IQSample>;

/// Result type for DSP operations
pub type DspResult<T> = Result<T, DspError>;

/// Errors that can occur during DSP operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum DspError {
    #[error("Decimation factor must be at least 1")]
    InvalidDecimation,

    #[error("Input signal is empty")]
    EmptySignal,

    #[error("Invalid code rate: {0}. Must be in (0, 1]")]
    InvalidCodeRate(f64),

    #[error("Invalid SNR: {0} dB. Must be finite")]
    InvalidSnr(f64),

    #[error("Signal energy is not finite")]
    NonFiniteEnergy,
}

/// Helper functions for working with complex samples
pub mod complex_ops {
    use super::*;

    /// Create a complex number from magnitude and phase
    #[inline]
    pub fn from_polar(magnitude: f64, phase: f64) -> Complex {
        Complex::new(magnitude * phase.cos(), magnitude * phase.sin())
    }

    /// Compute the power (magnitude squared) of a complex number
    #[inline]
    pub fn power(c: Complex) -> f64 {
        c.norm_sqr()
    }

    /// Compute the average power of a signal
    pub fn average_power(samples: &[IQSample]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().map(|s| power(*s)).sum::<f64>() / samples.len() as f64
    }

    /// Compute the arithmetic mean (DC offset) of a signal
    pub fn mean(samples: &[IQSample]) -> Complex {
        if samples.is_empty() {
            return Complex::new(0.0, 0.0);
        }
        samples.iter().copied().sum::<Complex>() / samples.len() as f64
    }

    /// Remove the DC offset by subtracting the arithmetic mean in place
    pub fn subtract_mean(samples: &mut [IQSample]) {
        let dc = mean(samples);
        for s in samples.iter_mut() {
            *s -= dc;
        }
    }
}
