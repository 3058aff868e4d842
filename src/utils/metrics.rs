//! Observability and Metrics
//!
//! This module provides process-wide counters for codec activity.
//!
//! Uses atomic counters so concurrent encode/decode calls never contend on a
//! lock; the counters are the only state shared between calls.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Global metrics collector for codec operations
#[derive(Debug)]
pub struct CodecMetrics {
    /// Successful top-level encode calls
    pub encodes_total: AtomicU64,
    /// Failed top-level encode calls
    pub encode_failures: AtomicU64,
    /// Bytes produced by successful encodes
    pub bytes_encoded: AtomicU64,
    /// Successful top-level decode calls
    pub decodes_total: AtomicU64,
    /// Failed top-level decode calls
    pub decode_failures: AtomicU64,
    /// Bytes consumed by successful decodes
    pub bytes_decoded: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl CodecMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            encodes_total: AtomicU64::new(0),
            encode_failures: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            decodes_total: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a successful encode of `byte_count` bytes
    pub fn encode_success(&self, byte_count: u64) {
        self.encodes_total.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a failed encode
    pub fn encode_failure(&self) {
        self.encode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful decode that consumed `byte_count` bytes
    pub fn decode_success(&self, byte_count: u64) {
        self.decodes_total.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a failed decode
    pub fn decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            encodes_total: self.encodes_total.load(Ordering::Relaxed),
            encode_failures: self.encode_failures.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            decodes_total: self.decodes_total.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            encodes_total = snapshot.encodes_total,
            encode_failures = snapshot.encode_failures,
            bytes_encoded = snapshot.bytes_encoded,
            decodes_total = snapshot.decodes_total,
            decode_failures = snapshot.decode_failures,
            bytes_decoded = snapshot.bytes_decoded,
            uptime_seconds = snapshot.uptime_seconds,
            "Codec metrics snapshot"
        );
    }
}

impl Default for CodecMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub encodes_total: u64,
    pub encode_failures: u64,
    pub bytes_encoded: u64,
    pub decodes_total: u64,
    pub decode_failures: u64,
    pub bytes_decoded: u64,
    pub uptime_seconds: u64,
}

/// Global metrics instance (lazy static for simplicity)
static METRICS: once_cell::sync::Lazy<CodecMetrics> = once_cell::sync::Lazy::new(CodecMetrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static CodecMetrics {
    &METRICS
}

/// Drop guard that logs how long a codec call took
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!(
            operation = self.operation,
            duration_us = self.start.elapsed().as_micros() as u64,
            "Codec call completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_counters() {
        let metrics = CodecMetrics::new();
        metrics.encode_success(8);
        metrics.encode_success(4);
        metrics.encode_failure();
        metrics.decode_success(8);
        metrics.decode_failure();
        metrics.decode_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.encodes_total, 2);
        assert_eq!(snapshot.bytes_encoded, 12);
        assert_eq!(snapshot.encode_failures, 1);
        assert_eq!(snapshot.decodes_total, 1);
        assert_eq!(snapshot.bytes_decoded, 8);
        assert_eq!(snapshot.decode_failures, 2);
    }

    #[test]
    fn test_global_counters_advance() {
        let before = global_metrics().snapshot();
        let _ = crate::encode(&42u32);
        let after = global_metrics().snapshot();
        assert!(after.encodes_total > before.encodes_total);
        assert!(after.bytes_encoded >= before.bytes_encoded + 4);
    }
}
