//! # Utility Modules
//!
//! Supporting utilities shared by the codec.
//!
//! ## Components
//! - **Metrics**: Thread-safe counters of encode/decode calls, bytes, and failures
//! - **Timer**: Drop guard logging call durations at `debug`

pub mod metrics;

pub use metrics::{global_metrics, CodecMetrics, MetricsSnapshot, Timer};
