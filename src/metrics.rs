use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing report processing activity.
#[derive(Default)]
pub struct ReportMetrics {
    reports_summarized: AtomicU64,
    reports_failed: AtomicU64,
    pages_extracted: AtomicU64,
}

impl ReportMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a report that made it through extraction and summarization.
    pub fn record_success(&self, page_count: u64) {
        self.reports_summarized.fetch_add(1, Ordering::Relaxed);
        self.pages_extracted.fetch_add(page_count, Ordering::Relaxed);
    }

    /// Record a report whose pipeline ended in an error.
    pub fn record_failure(&self) {
        self.reports_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reports_summarized: self.reports_summarized.load(Ordering::Relaxed),
            reports_failed: self.reports_failed.load(Ordering::Relaxed),
            pages_extracted: self.pages_extracted.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of processing counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Reports summarized successfully since startup.
    pub reports_summarized: u64,
    /// Reports that failed during staging, extraction, or summarization.
    pub reports_failed: u64,
    /// Total pages extracted across successful reports.
    pub pages_extracted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_successes_and_pages() {
        let metrics = ReportMetrics::new();
        metrics.record_success(2);
        metrics.record_success(3);
        metrics.record_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.reports_summarized, 2);
        assert_eq!(snapshot.pages_extracted, 5);
        assert_eq!(snapshot.reports_failed, 1);
    }

    #[test]
    fn fresh_metrics_are_zeroed() {
        assert_eq!(ReportMetrics::new().snapshot(), MetricsSnapshot::default());
    }
}
