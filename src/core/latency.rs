//! Simulated backend latency
//!
//! The query engine stands in for a remote API. Each operation calls the
//! configured [`Latency`] hook first; the default hook does nothing so tests
//! and scripts stay fast, and [`SimulatedLatency`] restores the delays the
//! dashboard was designed around.

use std::time::Duration;

/// Query engine operations that may be delayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Lookup,
    Stats,
    UpdateStatus,
}

impl Operation {
    /// Delay a real backend round trip was modelled at
    pub fn default_delay(&self) -> Duration {
        match self {
            Operation::List => Duration::from_millis(300),
            Operation::Lookup => Duration::from_millis(200),
            Operation::Stats => Duration::from_millis(150),
            Operation::UpdateStatus => Duration::from_millis(200),
        }
    }
}

/// Hook called before each query engine operation
pub trait Latency {
    fn pause(&self, op: Operation);
}

/// No delay
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLatency;

impl Latency for NoLatency {
    fn pause(&self, _op: Operation) {}
}

/// Sleeps for each operation's default delay, multiplied by `scale`
#[derive(Debug, Clone, Copy)]
pub struct SimulatedLatency {
    pub scale: f64,
}

impl SimulatedLatency {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    pub fn delay_for(&self, op: Operation) -> Duration {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Duration::ZERO;
        }
        op.default_delay().mul_f64(self.scale)
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl Latency for SimulatedLatency {
    fn pause(&self, op: Operation) {
        let delay = self.delay_for(op);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}
