//! Named stopwatch with summary statistics.
//!
//! A [`Timer`] keeps any number of labelled measurement series. Each
//! `start`/`stop` pair appends one duration to its label's series, and
//! [`Timer::stats`] summarises a series.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Summary of one label's measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingStats {
    /// Number of measurements
    pub count: usize,
    /// Shortest measurement
    pub min: Duration,
    /// Longest measurement
    pub max: Duration,
    /// Arithmetic mean
    pub mean: Duration,
    /// Median (mean of the two middle values for even counts)
    pub median: Duration,
    /// Population standard deviation
    pub std_dev: Duration,
}

impl TimingStats {
    /// Computes statistics over `samples`, or `None` if there are none.
    pub fn from_samples(samples: &[Duration]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let count = sorted.len();
        let total: Duration = sorted.iter().sum();
        let mean = total / count as u32;

        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2
        } else {
            sorted[mid]
        };

        let mean_ns = mean.as_secs_f64() * 1e9;
        let variance = sorted
            .iter()
            .map(|d| {
                let delta = d.as_secs_f64() * 1e9 - mean_ns;
                delta * delta
            })
            .sum::<f64>()
            / count as f64;
        let std_dev = Duration::from_nanos(variance.sqrt().round() as u64);

        Some(Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            median,
            std_dev,
        })
    }
}

impl fmt::Display for TimingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} min={:?} max={:?} mean={:?} median={:?} sd={:?}",
            self.count, self.min, self.max, self.mean, self.median, self.std_dev
        )
    }
}

/// Labelled stopwatch.
#[derive(Debug, Default)]
pub struct Timer {
    running: BTreeMap<String, Instant>,
    measurements: BTreeMap<String, Vec<Duration>>,
}

impl Timer {
    /// Creates a timer with no measurements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the measurement named `label`.
    pub fn start(&mut self, label: &str) {
        self.running.insert(label.to_string(), Instant::now());
    }

    /// Stops the measurement named `label` and records its duration.
    ///
    /// Returns the recorded duration, or `None` if `label` was never started.
    pub fn stop(&mut self, label: &str) -> Option<Duration> {
        let stopped = Instant::now();
        let Some(started) = self.running.remove(label) else {
            tracing::debug!(label, "Timer stopped without being started");
            return None;
        };

        let elapsed = stopped.duration_since(started);
        self.record(label, elapsed);
        Some(elapsed)
    }

    /// Appends an externally measured duration to `label`.
    pub fn record(&mut self, label: &str, elapsed: Duration) {
        self.measurements
            .entry(label.to_string())
            .or_default()
            .push(elapsed);
    }

    /// All measurements recorded under `label`, in recording order.
    pub fn measurements(&self, label: &str) -> &[Duration] {
        self.measurements
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Summary statistics for `label`.
    pub fn stats(&self, label: &str) -> Option<TimingStats> {
        TimingStats::from_samples(self.measurements(label))
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, samples) in &self.measurements {
            if let Some(stats) = TimingStats::from_samples(samples) {
                writeln!(f, "{label}: {stats}")?;
            }
        }
        Ok(())
    }
}
