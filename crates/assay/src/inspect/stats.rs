//! Streaming descriptive statistics.

use serde::{Deserialize, Serialize};

/// Descriptive statistics for a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Standardized score of `value`, or `None` for a constant column.
    pub fn z_score(&self, value: f64) -> Option<f64> {
        if self.std_dev > 0.0 {
            Some((value - self.mean) / self.std_dev)
        } else {
            None
        }
    }
}

/// Streaming statistics accumulator using Welford's algorithm.
/// Computes mean and variance in a single pass with O(1) memory.
#[derive(Debug, Clone)]
pub(crate) struct StreamingStats {
    count: usize,
    mean: f64,
    m2: f64, // Sum of squared differences from mean
    min: f64,
    max: f64,
}

impl StreamingStats {
    pub(crate) fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub(crate) fn add(&mut self, value: f64) {
        self.count += 1;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Population variance; samples are bounded and small, so no Bessel correction.
    fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    pub(crate) fn summary(&self) -> Option<NumericSummary> {
        if self.count == 0 {
            return None;
        }

        Some(NumericSummary {
            count: self.count,
            mean: self.mean,
            std_dev: self.variance().sqrt(),
            min: self.min,
            max: self.max,
        })
    }
}
