//! Basic metrics instrumentation for tracking performance.
//!
//! Provides counters and duration tracking for image host requests and
//! contact operations.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector shared by the image host client and the services.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of image host requests made
    image_host_requests_total: Arc<AtomicU64>,

    /// Total number of failed image host requests
    image_host_errors_total: Arc<AtomicU64>,

    /// Total duration of all image host requests in milliseconds
    image_host_duration_total_ms: Arc<AtomicU64>,

    contacts_created_total: Arc<AtomicU64>,
    contacts_updated_total: Arc<AtomicU64>,
    contacts_deleted_total: Arc<AtomicU64>,
    searches_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            image_host_requests_total: Arc::new(AtomicU64::new(0)),
            image_host_errors_total: Arc::new(AtomicU64::new(0)),
            image_host_duration_total_ms: Arc::new(AtomicU64::new(0)),
            contacts_created_total: Arc::new(AtomicU64::new(0)),
            contacts_updated_total: Arc::new(AtomicU64::new(0)),
            contacts_deleted_total: Arc::new(AtomicU64::new(0)),
            searches_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record an image host request with duration.
    pub fn record_image_host_request(&self, duration: Duration) {
        self.image_host_requests_total.fetch_add(1, Ordering::Relaxed);
        self.image_host_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a failed image host request.
    pub fn record_image_host_error(&self) {
        self.image_host_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_contact_created(&self) {
        self.contacts_created_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_contact_updated(&self) {
        self.contacts_updated_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_contact_deleted(&self) {
        self.contacts_deleted_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_search(&self) {
        self.searches_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn image_host_requests_total(&self) -> u64 {
        self.image_host_requests_total.load(Ordering::Relaxed)
    }

    pub fn image_host_errors_total(&self) -> u64 {
        self.image_host_errors_total.load(Ordering::Relaxed)
    }

    pub fn image_host_duration_total_ms(&self) -> u64 {
        self.image_host_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average image host request duration in milliseconds.
    pub fn image_host_duration_avg_ms(&self) -> f64 {
        let total = self.image_host_duration_total_ms.load(Ordering::Relaxed);
        let count = self.image_host_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn contacts_created_total(&self) -> u64 {
        self.contacts_created_total.load(Ordering::Relaxed)
    }

    pub fn contacts_updated_total(&self) -> u64 {
        self.contacts_updated_total.load(Ordering::Relaxed)
    }

    pub fn contacts_deleted_total(&self) -> u64 {
        self.contacts_deleted_total.load(Ordering::Relaxed)
    }

    pub fn searches_total(&self) -> u64 {
        self.searches_total.load(Ordering::Relaxed)
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            image_host_requests_total: self.image_host_requests_total(),
            image_host_errors_total: self.image_host_errors_total(),
            image_host_duration_avg_ms: self.image_host_duration_avg_ms(),
            contacts_created_total: self.contacts_created_total(),
            contacts_updated_total: self.contacts_updated_total(),
            contacts_deleted_total: self.contacts_deleted_total(),
            searches_total: self.searches_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub image_host_requests_total: u64,
    pub image_host_errors_total: u64,
    pub image_host_duration_avg_ms: f64,
    pub contacts_created_total: u64,
    pub contacts_updated_total: u64,
    pub contacts_deleted_total: u64,
    pub searches_total: u64,
}

/// Helper for timing image host requests.
pub struct HttpTimer {
    start: Instant,
    metrics: Metrics,
}

impl HttpTimer {
    /// Start timing a request.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        self.metrics.record_image_host_request(self.start.elapsed());
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        self.metrics.record_image_host_request(self.start.elapsed());
        self.metrics.record_image_host_error();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.image_host_requests_total(), 0);
        assert_eq!(metrics.image_host_errors_total(), 0);
        assert_eq!(metrics.image_host_duration_total_ms(), 0);
        assert_eq!(metrics.image_host_duration_avg_ms(), 0.0);
    }

    #[test]
    fn test_average_duration() {
        let metrics = Metrics::new();
        metrics.record_image_host_request(Duration::from_millis(100));
        metrics.record_image_host_request(Duration::from_millis(200));
        assert_eq!(metrics.image_host_requests_total(), 2);
        assert_eq!(metrics.image_host_duration_total_ms(), 300);
        assert_eq!(metrics.image_host_duration_avg_ms(), 150.0);
    }

    #[test]
    fn test_summary() {
        let metrics = Metrics::new();
        metrics.record_contact_created();
        metrics.record_contact_created();
        metrics.record_contact_updated();
        metrics.record_contact_deleted();
        metrics.record_search();

        let summary = metrics.summary();
        assert_eq!(summary.contacts_created_total, 2);
        assert_eq!(summary.contacts_updated_total, 1);
        assert_eq!(summary.contacts_deleted_total, 1);
        assert_eq!(summary.searches_total, 1);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["contactsCreatedTotal"], 2);
    }

    #[test]
    fn test_http_timer() {
        let metrics = Metrics::new();
        let timer = HttpTimer::new(metrics.clone());
        thread::sleep(Duration::from_millis(10));
        timer.complete();

        assert_eq!(metrics.image_host_requests_total(), 1);
        assert!(metrics.image_host_duration_total_ms() >= 10);
    }

    #[test]
    fn test_http_timer_with_error() {
        let metrics = Metrics::new();
        HttpTimer::new(metrics.clone()).complete_with_error();

        assert_eq!(metrics.image_host_requests_total(), 1);
        assert_eq!(metrics.image_host_errors_total(), 1);
    }

    #[test]
    fn test_concurrent_access() {
        let metrics = Metrics::new();
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let m = metrics.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        m.record_search();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.searches_total(), 200);
    }
}
