use std::collections::BTreeMap;
use std::future::Future;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const TRANSLATION: &str = "translation";
pub const SENTIMENT: &str = "sentiment";
pub const CHAT: &str = "chat";

#[derive(Debug, Clone, Copy, Default)]
struct CategoryStats {
    total_time: Duration,
    calls: u64,
}

/// Aggregated timing for one category, as served by `/metrics`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryMetrics {
    /// Seconds.
    pub total_time: f64,
    pub calls: u64,
    /// Seconds, 0 when there were no calls.
    pub average_time: f64,
}

/// Per-service timing statistics.
pub struct PerformanceMonitor {
    metrics: DashMap<&'static str, CategoryStats>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        let metrics = DashMap::new();
        for category in [TRANSLATION, SENTIMENT, CHAT] {
            metrics.insert(category, CategoryStats::default());
        }
        Self { metrics }
    }

    /// Run `fut` and record how long it took under `category`.
    ///
    /// The duration is recorded whatever the future yields. Unknown
    /// categories are timed but not recorded.
    pub async fn track<F: Future>(&self, category: &str, fut: F) -> F::Output {
        let start = Instant::now();
        let output = fut.await;
        self.record(category, start.elapsed());
        output
    }

    pub fn record(&self, category: &str, duration: Duration) {
        let Some(mut stats) = self.metrics.get_mut(category) else {
            return;
        };
        stats.total_time += duration;
        stats.calls += 1;
        let average = stats.total_time.as_secs_f64() / stats.calls as f64;
        debug!(
            "{} operation took {:.2}s (avg: {:.2}s)",
            category,
            duration.as_secs_f64(),
            average
        );
    }

    pub fn snapshot(&self) -> BTreeMap<String, CategoryMetrics> {
        self.metrics
            .iter()
            .map(|entry| {
                let stats = *entry.value();
                let total_time = stats.total_time.as_secs_f64();
                let average_time = if stats.calls > 0 {
                    total_time / stats.calls as f64
                } else {
                    0.0
                };
                (
                    entry.key().to_string(),
                    CategoryMetrics {
                        total_time,
                        calls: stats.calls,
                        average_time,
                    },
                )
            })
            .collect()
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_monitor_reports_zero_averages() {
        let monitor = PerformanceMonitor::new();
        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.len(), 3);
        for metrics in snapshot.values() {
            assert_eq!(metrics.calls, 0);
            assert_eq!(metrics.average_time, 0.0);
        }
    }

    #[test]
    fn average_is_total_over_calls() {
        let monitor = PerformanceMonitor::new();
        monitor.record(CHAT, Duration::from_millis(100));
        monitor.record(CHAT, Duration::from_millis(300));
        let chat = monitor.snapshot()[CHAT];
        assert_eq!(chat.calls, 2);
        assert!((chat.total_time - 0.4).abs() < 1e-9);
        assert!((chat.average_time - 0.2).abs() < 1e-9);
    }

    #[test]
    fn unknown_category_is_ignored() {
        let monitor = PerformanceMonitor::new();
        monitor.record("ocr", Duration::from_secs(1));
        assert!(!monitor.snapshot().contains_key("ocr"));
    }

    #[tokio::test]
    async fn track_counts_failed_calls_too() {
        let monitor = PerformanceMonitor::new();
        let result: Result<(), &str> = monitor.track(SENTIMENT, async { Err("boom") }).await;
        assert!(result.is_err());
        assert_eq!(monitor.snapshot()[SENTIMENT].calls, 1);
    }
}
