//! Polyphase Decimating FIR for real-valued traces
//!
//! Combines lowpass filtering with integer decimation by evaluating the FIR
//! only at output instants, the standard polyphase shortcut. Used by the RSSI
//! estimator to downsample dBm traces without aliasing the power envelope.
//!
//! ## Example
//!
//! ```rust
//! use rfprobe_core::decimation::DecimatingFir;
//!
//! let fir = DecimatingFir::lowpass(4);
//! let trace: Vec<f64> = vec![1.0; 100];
//! let out = fir.process(&trace);
//! assert_eq!(out.len(), 25); // floor(100 / 4)
//! ```

/// Lowpass FIR evaluated only at decimation phases.
///
/// One-shot: `process` consumes a whole trace at once. Output `m` is the
/// filter evaluated with sample `(m + 1) * decimation - 1` as the newest
/// input, so output length is `floor(input_len / decimation)` and a trailing
/// partial phase is dropped.
#[derive(Debug, Clone)]
pub struct DecimatingFir {
    /// FIR filter taps, normalized to unit DC gain.
    taps: Vec<f64>,
    /// Decimation factor (keep 1 in N).
    decim: usize,
}

impl DecimatingFir {
    /// Create a decimating FIR from explicit taps.
    pub fn new(taps: &[f64], decimation: usize) -> Self {
        Self {
            taps: taps.to_vec(),
            decim: decimation.max(1),
        }
    }

    /// Create with an auto-designed windowed-sinc lowpass.
    ///
    /// Cutoff sits at π/decimation with `8 * decimation + 1` taps, enough
    /// rolloff to suppress the folded bands for power-trace use.
    pub fn lowpass(decimation: usize) -> Self {
        let decim = decimation.max(1);
        let num_taps = decim * 8 + 1;
        let cutoff = 1.0 / decim as f64;
        Self::new(&design_lowpass(num_taps, cutoff), decim)
    }

    /// Filter and downsample a real-valued trace.
    pub fn process(&self, input: &[f64]) -> Vec<f64> {
        let mut output = Vec::with_capacity(input.len() / self.decim);
        let mut newest = self.decim;
        while newest <= input.len() {
            let mut acc = 0.0;
            for (i, &tap) in self.taps.iter().enumerate() {
                match (newest - 1).checked_sub(i) {
                    Some(j) => acc += tap * input[j],
                    // Samples before the trace start are zero
                    None => break,
                }
            }
            output.push(acc);
            newest += self.decim;
        }
        output
    }

    /// Decimation factor.
    pub fn decimation(&self) -> usize {
        self.decim
    }

    /// Filter order (number of taps).
    pub fn order(&self) -> usize {
        self.taps.len()
    }

    /// Filter taps.
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }
}

/// Design a lowpass FIR using the windowed-sinc method (Hamming window),
/// normalized to unit gain at DC.
fn design_lowpass(num_taps: usize, cutoff: f64) -> Vec<f64> {
    let n = num_taps.max(1);
    let m = (n - 1) as f64 / 2.0;
    let mut taps = Vec::with_capacity(n);

    for i in 0..n {
        let x = i as f64 - m;
        let sinc = if x.abs() < 1e-10 {
            cutoff
        } else {
            (std::f64::consts::PI * cutoff * x).sin() / (std::f64::consts::PI * x)
        };
        let window = if n > 1 {
            0.54 - 0.46 * (2.0 * std::f64::consts::PI * i as f64 / (n - 1) as f64).cos()
        } else {
            1.0
        };
        taps.push(sinc * window);
    }

    let sum: f64 = taps.iter().sum();
    if sum.abs() > 1e-10 {
        for t in &mut taps {
            *t /= sum;
        }
    }

    taps
}
