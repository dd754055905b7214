//! HTTP Adapters
//!
//! - `server`: Dashboard JSON API plus health and metrics routes

pub mod server;

pub use server::{ApiState, LiveDashboard};
