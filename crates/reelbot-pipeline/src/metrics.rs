use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::process::UpdateOutcome;

/// Lock-free per-process counters, surfaced by the health endpoint.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    updates: AtomicU64,
    parse_errors: AtomicU64,
    ignored: AtomicU64,
    ingested: AtomicU64,
    replies: AtomicU64,
    store_failures: AtomicU64,
    failed_dispatches: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub updates: u64,
    pub parse_errors: u64,
    pub ignored: u64,
    pub ingested: u64,
    pub replies: u64,
    pub store_failures: u64,
    pub failed_dispatches: u64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_parse_error(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record(&self, outcome: &UpdateOutcome) {
        self.updates.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            UpdateOutcome::Ignored | UpdateOutcome::NoReply => &self.ignored,
            UpdateOutcome::Ingested(_) => &self.ingested,
            UpdateOutcome::Replied => &self.replies,
            UpdateOutcome::StoreFailed(_) => &self.store_failures,
            UpdateOutcome::DeliveryFailed(_) => &self.failed_dispatches,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            updates: self.updates.load(Ordering::Relaxed),
            parse_errors: self.parse_errors.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            ingested: self.ingested.load(Ordering::Relaxed),
            replies: self.replies.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            failed_dispatches: self.failed_dispatches.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelbot_store::InsertOutcome;
    use reelbot_telegram::DeliveryError;

    #[test]
    fn outcomes_land_in_their_counters() {
        let m = PipelineMetrics::new();
        m.record(&UpdateOutcome::Replied);
        m.record(&UpdateOutcome::Ingested(InsertOutcome::AlreadyExists));
        m.record(&UpdateOutcome::NoReply);
        m.record(&UpdateOutcome::DeliveryFailed(DeliveryError::Rejected {
            method: "sendVideo",
            status: 400,
            description: "Bad Request: wrong file identifier".to_string(),
        }));
        m.record_parse_error();

        let s = m.snapshot();
        assert_eq!(s.updates, 5);
        assert_eq!(s.replies, 1);
        assert_eq!(s.ingested, 1);
        assert_eq!(s.ignored, 1);
        assert_eq!(s.parse_errors, 1);
        assert_eq!(s.failed_dispatches, 1);
        assert_eq!(s.store_failures, 0);
    }
}
