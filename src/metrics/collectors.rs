use serde::Serialize;
use std::time::Duration;

use crate::utils::time::as_millis_f64;

/// Collects per-submission latencies and summarises them
#[derive(Debug, Default)]
pub struct LatencyCollector {
    samples: Vec<Duration>,
}

impl LatencyCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Add a latency sample
    pub fn record(&mut self, latency: Duration) {
        self.samples.push(latency);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Summarise all samples recorded so far
    pub fn statistics(&self) -> LatencyStatistics {
        if self.samples.is_empty() {
            return LatencyStatistics::default();
        }

        let mut sorted_samples = self.samples.clone();
        sorted_samples.sort();

        let len = sorted_samples.len();
        let percentile = |p: f64| sorted_samples[((len as f64 * p) as usize).min(len - 1)];

        let total: Duration = sorted_samples.iter().sum();

        LatencyStatistics {
            count: len as u64,
            min: sorted_samples[0],
            max: sorted_samples[len - 1],
            mean: total / len as u32,
            p50: percentile(0.50),
            p95: percentile(0.95),
            p99: percentile(0.99),
            p999: percentile(0.999),
        }
    }
}

/// Aggregated latency statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatencyStatistics {
    pub count: u64,
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
    pub p50: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub p999: Duration,
}

impl LatencyStatistics {
    /// Convert to microseconds for easier reading
    pub fn to_micros(&self) -> LatencyMicros {
        let micros = |d: Duration| as_millis_f64(d) * 1_000.0;
        LatencyMicros {
            count: self.count,
            min: micros(self.min),
            max: micros(self.max),
            mean: micros(self.mean),
            p50: micros(self.p50),
            p95: micros(self.p95),
            p99: micros(self.p99),
            p999: micros(self.p999),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LatencyMicros {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub p999: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_collector() {
        let mut collector = LatencyCollector::new();
        assert!(collector.is_empty());
        assert_eq!(collector.statistics().count, 0);

        collector.record(Duration::from_micros(300));
        collector.record(Duration::from_micros(100));
        collector.record(Duration::from_micros(200));

        let stats = collector.statistics();
        assert_eq!(collector.len(), 3);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, Duration::from_micros(100));
        assert_eq!(stats.max, Duration::from_micros(300));
        assert_eq!(stats.mean, Duration::from_micros(200));
        assert_eq!(stats.p50, Duration::from_micros(200));
        assert_eq!(stats.p999, Duration::from_micros(300));
    }

    #[test]
    fn test_single_sample_percentiles() {
        let mut collector = LatencyCollector::with_capacity(1);
        collector.record(Duration::from_micros(42));

        let stats = collector.statistics();
        assert_eq!(stats.p50, stats.p99);
        assert_eq!(stats.to_micros().p99.round(), 42.0);
    }
}
