// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Running-statistics primitives
//!
//! Cheap single-pass accumulators used for per-neuron activity tracking and
//! for the reservoir-level health report. No sample storage; everything is
//! derivable from count / min / max / sum / sum-of-squares.

use serde::{Deserialize, Serialize};

/// Single-pass accumulator over a stream of samples.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunningStat {
    count: u64,
    min: f64,
    max: f64,
    sum: f64,
    sum_sq: f64,
}

impl Default for RunningStat {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningStat {
    pub fn new() -> Self {
        Self {
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    #[inline]
    pub fn push(&mut self, sample: f64) {
        self.count += 1;
        self.min = self.min.min(sample);
        self.max = self.max.max(sample);
        self.sum += sample;
        self.sum_sq += sample * sample;
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Smallest observed sample, or 0 before any sample arrived.
    pub fn min(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.min
        }
    }

    /// Largest observed sample, or 0 before any sample arrived.
    pub fn max(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.max
        }
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Population variance.
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.sum_sq / self.count as f64 - mean * mean).max(0.0)
    }

    pub fn stdev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Root mean square of the samples (magnitude regardless of sign).
    pub fn rms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.sum_sq / self.count as f64).sqrt()
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

/// Per-neuron activity statistics maintained by the simulation engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeuronStats {
    /// Cycles this neuron has been settled with statistics enabled.
    pub cycles: u64,
    /// Firing events (spiking neurons only; analog neurons stay at 0).
    pub fires: u64,
    /// Span of the emitted output signal.
    pub output: RunningStat,
}

impl NeuronStats {
    pub fn record(&mut self, output: f64, fired: bool) {
        self.cycles += 1;
        if fired {
            self.fires += 1;
        }
        self.output.push(output);
    }

    /// Fraction of observed cycles in which the neuron fired.
    pub fn firing_rate(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.fires as f64 / self.cycles as f64
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_stat_tracks_span_and_moments() {
        let mut stat = RunningStat::new();
        for v in [1.0, 2.0, 3.0, 4.0] {
            stat.push(v);
        }
        assert_eq!(stat.count(), 4);
        assert_eq!(stat.min(), 1.0);
        assert_eq!(stat.max(), 4.0);
        assert_eq!(stat.mean(), 2.5);
        assert!((stat.variance() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn empty_stat_reports_zeros() {
        let stat = RunningStat::new();
        assert_eq!(stat.min(), 0.0);
        assert_eq!(stat.max(), 0.0);
        assert_eq!(stat.mean(), 0.0);
        assert_eq!(stat.stdev(), 0.0);
    }

    #[test]
    fn firing_rate_is_fires_over_cycles() {
        let mut stats = NeuronStats::default();
        stats.record(1.0, true);
        stats.record(0.0, false);
        stats.record(0.0, false);
        stats.record(1.0, true);
        assert_eq!(stats.firing_rate(), 0.5);
    }
}
