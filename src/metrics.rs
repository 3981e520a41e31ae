//! Performance metrics and statistics tracking for the scoring service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for both scoring pipelines
pub struct ScoringMetrics {
    /// Total transactions scored
    pub transactions_scored: AtomicU64,
    /// Transactions classified as fraud
    pub frauds_flagged: AtomicU64,
    /// Total loan applications scored
    pub loans_scored: AtomicU64,
    /// Applications classified eligible
    pub loans_eligible: AtomicU64,
    /// Requests that failed with a scoring error
    pub scoring_errors: AtomicU64,
    /// Per-request processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Fraud probability distribution buckets
    score_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ScoringMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            transactions_scored: AtomicU64::new(0),
            frauds_flagged: AtomicU64::new(0),
            loans_scored: AtomicU64::new(0),
            loans_eligible: AtomicU64::new(0),
            scoring_errors: AtomicU64::new(0),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            score_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a scored fraud batch
    pub fn record_fraud_batch(
        &self,
        processing_time: Duration,
        probabilities: &[f64],
        flagged: u64,
    ) {
        self.transactions_scored
            .fetch_add(probabilities.len() as u64, Ordering::Relaxed);
        self.frauds_flagged.fetch_add(flagged, Ordering::Relaxed);

        self.record_time(processing_time);

        if let Ok(mut buckets) = self.score_buckets.write() {
            for &probability in probabilities {
                let bucket = (probability * 10.0).min(9.0) as usize;
                buckets[bucket] += 1;
            }
        }
    }

    /// Record a scored loan application
    pub fn record_loan(&self, processing_time: Duration, eligible: bool) {
        self.loans_scored.fetch_add(1, Ordering::Relaxed);
        if eligible {
            self.loans_eligible.fetch_add(1, Ordering::Relaxed);
        }

        self.record_time(processing_time);
    }

    /// Record a failed scoring request
    pub fn record_error(&self) {
        self.scoring_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn record_time(&self, processing_time: Duration) {
        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only last 10000 for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = self.processing_times.read().unwrap();
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (scored items per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            let items = self.transactions_scored.load(Ordering::Relaxed)
                + self.loans_scored.load(Ordering::Relaxed);
            items as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get fraud probability distribution
    pub fn get_score_distribution(&self) -> [u64; 10] {
        *self.score_buckets.read().unwrap()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let tx_count = self.transactions_scored.load(Ordering::Relaxed);
        let flagged = self.frauds_flagged.load(Ordering::Relaxed);
        let loans = self.loans_scored.load(Ordering::Relaxed);
        let eligible = self.loans_eligible.load(Ordering::Relaxed);
        let errors = self.scoring_errors.load(Ordering::Relaxed);

        let flag_rate = if tx_count > 0 {
            (flagged as f64 / tx_count as f64) * 100.0
        } else {
            0.0
        };

        let processing = self.get_processing_stats();
        let throughput = self.get_throughput();
        let score_dist = self.get_score_distribution();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║            RISK SCORING SERVICE - METRICS SUMMARY            ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Transactions Scored: {:>8}  │  Flagged: {:>6} ({:>5.1}%)   ║",
            tx_count, flagged, flag_rate
        );
        info!(
            "║ Loans Scored:        {:>8}  │  Eligible: {:>6}            ║",
            loans, eligible
        );
        info!(
            "║ Errors: {:>8}  │  Throughput: {:>6.1} items/s              ║",
            errors, throughput
        );
        info!(
            "║ Processing Time (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5} ║",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.p99_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Fraud Probability Distribution:                              ║");
        let total: u64 = score_dist.iter().sum();
        for (i, &count) in score_dist.iter().enumerate() {
            let pct = if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            let bar_len = (pct / 2.0) as usize;
            let bar: String = "█".repeat(bar_len.min(20));
            info!(
                "║   {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for ScoringMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<ScoringMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<ScoringMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = ScoringMetrics::new();

        metrics.record_fraud_batch(Duration::from_micros(150), &[0.2, 0.8, 0.9], 2);
        metrics.record_loan(Duration::from_micros(90), true);
        metrics.record_loan(Duration::from_micros(110), false);
        metrics.record_error();

        assert_eq!(metrics.transactions_scored.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.frauds_flagged.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.loans_scored.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.loans_eligible.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.scoring_errors.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_score_distribution_buckets() {
        let metrics = ScoringMetrics::new();

        metrics.record_fraud_batch(Duration::from_micros(100), &[0.05, 0.55, 0.95, 1.0], 2);

        let dist = metrics.get_score_distribution();
        assert_eq!(dist[0], 1);
        assert_eq!(dist[5], 1);
        assert_eq!(dist[9], 2); // 0.95 and the 1.0 edge case share the top bucket
    }

    #[test]
    fn test_processing_stats() {
        let metrics = ScoringMetrics::new();

        metrics.record_fraud_batch(Duration::from_micros(100), &[0.1], 0);
        metrics.record_fraud_batch(Duration::from_micros(300), &[0.2], 0);

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean_us, 200);
    }
}
