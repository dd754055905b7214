//! Metrics and Monitoring Adapters
//!
//! Prometheus metrics registry and the liveness/readiness state
//! served by the HTTP API alongside `/metrics`.

pub mod health;
pub mod prometheus;

pub use health::HealthState;
pub use prometheus::MetricsRegistry;
