//! Pooled accumulation and sample statistics
//!
//! The aggregation policy is a single pooled mean: every contribution counts
//! once, regardless of which tree or bucket it came from.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Running `(sum, count)` pair reduced to a pooled mean
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeltaAccumulator {
    sum: f64,
    count: u64,
}

impl DeltaAccumulator {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one contribution
    pub fn push(&mut self, delta: f64) {
        self.sum += delta;
        self.count += 1;
    }

    /// Fold another accumulator into this one
    pub fn merge(&mut self, other: &DeltaAccumulator) {
        self.sum += other.sum;
        self.count += other.count;
    }

    /// Sum of all contributions
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Number of contributions
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Pooled mean, failing when nothing was pushed
    pub fn mean(&self) -> Result<f64> {
        if self.count == 0 {
            return Err(CoreError::DivisionByZero);
        }
        Ok(self.sum / self.count as f64)
    }

    /// Pooled mean, `None` when nothing was pushed
    pub fn running_mean(&self) -> Option<f64> {
        self.mean().ok()
    }
}

impl Extend<f64> for DeltaAccumulator {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for delta in iter {
            self.push(delta);
        }
    }
}

impl FromIterator<f64> for DeltaAccumulator {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

/// Individual deltas and root scores gathered during one pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeltaSamples {
    /// One entry per leaf: `leaf - root`
    pub deltas: Vec<f64>,
    /// One entry per tree: the root score
    pub root_scores: Vec<f64>,
}

impl DeltaSamples {
    /// Pooled mean of the deltas
    pub fn mean_delta(&self) -> Result<f64> {
        self.deltas.iter().copied().collect::<DeltaAccumulator>().mean()
    }

    /// Mean of the root scores
    pub fn mean_root(&self) -> Result<f64> {
        self.root_scores
            .iter()
            .copied()
            .collect::<DeltaAccumulator>()
            .mean()
    }
}

/// Equal-width histogram
///
/// `edges` has one more entry than `counts`; every bin is half-open except
/// the last, which also includes the upper edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Number of samples per bin
    pub counts: Vec<u64>,
    /// Bin edges, ascending
    pub edges: Vec<f64>,
}

/// Default number of histogram bins
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

impl Histogram {
    /// Bin `samples` into `bins` equal-width bins over their range
    pub fn from_samples(samples: &[f64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(CoreError::InvalidHistogram {
                reason: "bin count must be greater than 0".to_string(),
            });
        }
        if samples.iter().any(|v| !v.is_finite()) {
            return Err(CoreError::InvalidHistogram {
                reason: "samples must be finite".to_string(),
            });
        }
        if samples.is_empty() {
            return Ok(Self::default());
        }

        let mut lo = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        // Scaled before subtracting so a range wider than f64::MAX stays finite
        let n = bins as f64;
        let width = hi / n - lo / n;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| {
                if i == bins {
                    hi
                } else {
                    let t = i as f64 / n;
                    lo * (1.0 - t) + hi * t
                }
            })
            .collect();

        let mut counts = vec![0u64; bins];
        for &value in samples {
            let position = value / width - lo / width;
            let bin = (position.max(0.0) as usize).min(bins - 1);
            counts[bin] += 1;
        }

        Ok(Self { counts, edges })
    }

    /// Total number of binned samples
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of bins
    pub fn bins(&self) -> usize {
        self.counts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_accumulator_fails() {
        let acc = DeltaAccumulator::new();
        assert_eq!(acc.mean(), Err(CoreError::DivisionByZero));
        assert_eq!(acc.running_mean(), None);
    }

    #[test]
    fn test_pooled_mean() {
        let acc: DeltaAccumulator = [10.0, 0.0, 0.0, 0.0].into_iter().collect();
        assert_eq!(acc.count(), 4);
        assert_eq!(acc.mean().unwrap(), 2.5);
    }

    #[test]
    fn test_merge_pools_counts() {
        let mut a: DeltaAccumulator = [10.0].into_iter().collect();
        let b: DeltaAccumulator = [0.0, 0.0, 0.0].into_iter().collect();
        a.merge(&b);
        assert_eq!(a.mean().unwrap(), 2.5);
    }

    #[test]
    fn test_histogram_basic() {
        let hist = Histogram::from_samples(&[0.0, 0.1, 0.5, 1.0], 2).unwrap();
        assert_eq!(hist.edges, vec![0.0, 0.5, 1.0]);
        assert_eq!(hist.counts, vec![2, 2]);
    }

    #[test]
    fn test_histogram_last_bin_closed() {
        let hist = Histogram::from_samples(&[-1.0, 1.0], 4).unwrap();
        assert_eq!(hist.counts, vec![1, 0, 0, 1]);
        assert_eq!(hist.total(), 2);
    }

    #[test]
    fn test_histogram_constant_sample() {
        let hist = Histogram::from_samples(&[0.25, 0.25], 10).unwrap();
        assert_eq!(hist.edges.first().copied(), Some(-0.25));
        assert_eq!(hist.edges.last().copied(), Some(0.75));
        assert_eq!(hist.total(), 2);
    }

    #[test]
    fn test_histogram_empty_and_invalid() {
        assert_eq!(Histogram::from_samples(&[], 10).unwrap().bins(), 0);
        assert!(Histogram::from_samples(&[1.0], 0).is_err());
        assert!(Histogram::from_samples(&[f64::NAN], 3).is_err());
    }

    #[test]
    fn test_histogram_range_wider_than_f64_max() {
        let hist = Histogram::from_samples(&[-1e308, 0.0, 1e308], 4).unwrap();
        assert!(hist.edges.iter().all(|e| e.is_finite()));
        assert!(hist.edges.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(hist.edges.first().copied(), Some(-1e308));
        assert_eq!(hist.edges.last().copied(), Some(1e308));
        assert_eq!(hist.counts, vec![1, 0, 1, 1]);
    }

    #[test]
    fn test_samples_means() {
        let samples = DeltaSamples {
            deltas: vec![1.0, -1.0, 3.0],
            root_scores: vec![0.5],
        };
        assert_eq!(samples.mean_delta().unwrap(), 1.0);
        assert_eq!(samples.mean_root().unwrap(), 0.5);
        assert!(DeltaSamples::default().mean_delta().is_err());
    }
}
