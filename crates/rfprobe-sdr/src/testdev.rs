//! Scripted in-memory device for exercising sessions without hardware.
//!
//! Streams generate deterministic samples and can be scripted to return
//! short reads, stall entirely, or clip a write, so the retry and failure
//! paths are testable on any machine.

use crate::device::{
    Direction, RadioDevice, RxStream, SampleFormat, SdrError, SdrResult, TxStream,
};
use rfprobe_core::types::IQSample;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Shared record of everything a scripted stream saw.
#[derive(Debug, Default)]
pub struct StreamLog {
    pub written: Vec<IQSample>,
    pub activations: usize,
    pub deactivations: usize,
    pub reads: usize,
}

fn di(direction: Direction) -> usize {
    match direction {
        Direction::Rx => 0,
        Direction::Tx => 1,
    }
}

/// In-memory device: setters store, getters read back, streams are scripted.
pub struct ScriptedDevice {
    mtu: usize,
    rates: [f64; 2],
    freqs: [f64; 2],
    bws: [f64; 2],
    gains: [HashMap<String, f64>; 2],
    pub rx_log: Arc<Mutex<StreamLog>>,
    pub tx_log: Arc<Mutex<StreamLog>>,
}

impl ScriptedDevice {
    pub fn new(mtu: usize) -> Self {
        Self {
            mtu,
            rates: [0.0; 2],
            freqs: [0.0; 2],
            bws: [0.0; 2],
            gains: [HashMap::new(), HashMap::new()],
            rx_log: Arc::new(Mutex::new(StreamLog::default())),
            tx_log: Arc::new(Mutex::new(StreamLog::default())),
        }
    }
}

impl RadioDevice for ScriptedDevice {
    fn set_sample_rate(&mut self, direction: Direction, rate: f64) -> SdrResult<f64> {
        self.rates[di(direction)] = rate;
        Ok(rate)
    }

    fn sample_rate(&self, direction: Direction) -> f64 {
        self.rates[di(direction)]
    }

    fn set_frequency(&mut self, direction: Direction, freq_hz: f64) -> SdrResult<f64> {
        self.freqs[di(direction)] = freq_hz;
        Ok(freq_hz)
    }

    fn frequency(&self, direction: Direction) -> f64 {
        self.freqs[di(direction)]
    }

    fn set_bandwidth(&mut self, direction: Direction, bw_hz: f64) -> SdrResult<f64> {
        self.bws[di(direction)] = bw_hz;
        Ok(bw_hz)
    }

    fn bandwidth(&self, direction: Direction) -> f64 {
        self.bws[di(direction)]
    }

    fn set_gain(&mut self, direction: Direction, stage: &str, gain_db: f64) -> SdrResult<f64> {
        self.gains[di(direction)].insert(stage.to_string(), gain_db);
        Ok(gain_db)
    }

    fn gain(&self, direction: Direction, stage: &str) -> f64 {
        self.gains[di(direction)].get(stage).copied().unwrap_or(0.0)
    }

    fn open_rx_stream(&mut self, _format: SampleFormat) -> SdrResult<Box<dyn RxStream>> {
        Ok(Box::new(ScriptedRxStream::new(
            self.mtu,
            Arc::clone(&self.rx_log),
        )))
    }

    fn open_tx_stream(&mut self, _format: SampleFormat) -> SdrResult<Box<dyn TxStream>> {
        Ok(Box::new(ScriptedTxStream::new(
            self.mtu,
            Arc::clone(&self.tx_log),
        )))
    }
}

/// Deterministic sample the scripted RX source emits at absolute index `i`.
///
/// Carries a DC offset on both rails so mean subtraction has work to do.
pub fn rx_sample_at(i: u64) -> IQSample {
    IQSample::new(
        0.7 + (i as f64 * 0.013).sin(),
        -0.3 + (i as f64 * 0.017).cos(),
    )
}

/// RX stream yielding `rx_sample_at` values, with scriptable short reads.
pub struct ScriptedRxStream {
    mtu: usize,
    active: bool,
    pos: u64,
    /// Upcoming read results: each entry is the sample count the next read
    /// delivers instead of a full buffer.
    short_reads: VecDeque<usize>,
    /// When set, every read returns zero samples.
    stalled: bool,
    log: Arc<Mutex<StreamLog>>,
}

impl ScriptedRxStream {
    pub fn new(mtu: usize, log: Arc<Mutex<StreamLog>>) -> Self {
        Self {
            mtu,
            active: false,
            pos: 0,
            short_reads: VecDeque::new(),
            stalled: false,
            log,
        }
    }

    pub fn with_short_reads(mut self, counts: &[usize]) -> Self {
        self.short_reads = counts.iter().copied().collect();
        self
    }

    pub fn stalled(mut self) -> Self {
        self.stalled = true;
        self
    }
}

impl RxStream for ScriptedRxStream {
    fn activate(&mut self) -> SdrResult<()> {
        self.active = true;
        self.log.lock().unwrap().activations += 1;
        Ok(())
    }

    fn deactivate(&mut self) -> SdrResult<()> {
        self.active = false;
        self.log.lock().unwrap().deactivations += 1;
        Ok(())
    }

    fn read(&mut self, buffer: &mut [IQSample]) -> SdrResult<usize> {
        if !self.active {
            return Err(SdrError::NotActive);
        }
        self.log.lock().unwrap().reads += 1;
        if self.stalled {
            return Ok(0);
        }
        let n = match self.short_reads.pop_front() {
            Some(short) => short.min(buffer.len()),
            None => buffer.len(),
        };
        for slot in buffer.iter_mut().take(n) {
            *slot = rx_sample_at(self.pos);
            self.pos += 1;
        }
        Ok(n)
    }

    fn mtu(&self) -> usize {
        self.mtu
    }
}

/// TX stream recording written samples, with a scriptable clipped write.
pub struct ScriptedTxStream {
    mtu: usize,
    active: bool,
    writes: usize,
    /// Write call number (1-based) that consumes only half its samples.
    clip_write: Option<usize>,
    /// Sleep per write so the transmit worker is paced like real hardware.
    pace: Duration,
    log: Arc<Mutex<StreamLog>>,
}

impl ScriptedTxStream {
    pub fn new(mtu: usize, log: Arc<Mutex<StreamLog>>) -> Self {
        Self {
            mtu,
            active: false,
            writes: 0,
            clip_write: None,
            pace: Duration::from_micros(200),
            log,
        }
    }

    pub fn with_clipped_write(mut self, write_number: usize) -> Self {
        self.clip_write = Some(write_number);
        self
    }
}

impl TxStream for ScriptedTxStream {
    fn activate(&mut self) -> SdrResult<()> {
        self.active = true;
        self.log.lock().unwrap().activations += 1;
        Ok(())
    }

    fn deactivate(&mut self) -> SdrResult<()> {
        self.active = false;
        self.log.lock().unwrap().deactivations += 1;
        Ok(())
    }

    fn write(&mut self, samples: &[IQSample]) -> SdrResult<usize> {
        if !self.active {
            return Err(SdrError::NotActive);
        }
        thread::sleep(self.pace);
        self.writes += 1;
        let n = if self.clip_write == Some(self.writes) {
            samples.len() / 2
        } else {
            samples.len()
        };
        self.log.lock().unwrap().written.extend_from_slice(&samples[..n]);
        Ok(n)
    }

    fn mtu(&self) -> usize {
        self.mtu
    }
}
