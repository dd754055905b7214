//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP clients, blockchain RPC) and serves the
//! dashboard API. Each sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `ai`: Text generation (Gemini)
//! - `chain`: Sepolia interaction via alloy-rs
//! - `http`: Dashboard JSON API server
//! - `metrics`: Prometheus metrics and health checks

pub mod ai;
pub mod chain;
pub mod http;
pub mod metrics;
