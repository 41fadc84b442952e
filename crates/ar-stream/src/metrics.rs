// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only metrics snapshot for the Stream Publisher.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublisherMetrics {
    pub events_published: u64,
    pub batches_published: u64,
    pub avg_batch_size: f64,
    pub avg_publish_latency_ms: f64,
    pub publish_failures: u64,
    pub last_publish_timestamp_ms: Option<i64>,
}

/// Mutable accumulator guarded by the publisher's metrics mutex; folds new
/// samples into the running averages without keeping raw history.
#[derive(Default)]
pub struct MetricsAccumulator {
    snapshot: PublisherMetrics,
}

impl MetricsAccumulator {
    pub fn record_batch(&mut self, batch_size: u64, now_ms: i64) {
        let n = self.batches_published_plus_one();
        self.snapshot.avg_batch_size =
            running_average(self.snapshot.avg_batch_size, n - 1, batch_size as f64);
        self.snapshot.batches_published = n;
        self.snapshot.last_publish_timestamp_ms = Some(now_ms);
    }

    pub fn record_publish_success(&mut self, latency_ms: f64) {
        let n = self.snapshot.events_published + 1;
        self.snapshot.avg_publish_latency_ms = running_average(
            self.snapshot.avg_publish_latency_ms,
            self.snapshot.events_published,
            latency_ms,
        );
        self.snapshot.events_published = n;
    }

    pub fn record_publish_failure(&mut self) {
        self.snapshot.publish_failures += 1;
    }

    pub fn snapshot(&self) -> PublisherMetrics {
        self.snapshot.clone()
    }

    fn batches_published_plus_one(&self) -> u64 {
        self.snapshot.batches_published + 1
    }
}

fn running_average(current: f64, count: u64, sample: f64) -> f64 {
    if count == 0 {
        sample
    } else {
        (current * count as f64 + sample) / (count as f64 + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_average_of_repeated_samples_is_stable() {
        let mut acc = MetricsAccumulator::default();
        acc.record_batch(10, 0);
        acc.record_batch(20, 0);
        assert_eq!(acc.snapshot().avg_batch_size, 15.0);
    }

    #[test]
    fn failures_do_not_affect_success_averages() {
        let mut acc = MetricsAccumulator::default();
        acc.record_publish_success(100.0);
        acc.record_publish_failure();
        let snap = acc.snapshot();
        assert_eq!(snap.avg_publish_latency_ms, 100.0);
        assert_eq!(snap.publish_failures, 1);
        assert_eq!(snap.events_published, 1);
    }
}
