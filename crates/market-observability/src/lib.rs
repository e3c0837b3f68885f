//! Observability for the marketplace resolution engine.
//!
//! This crate provides:
//! - `init_tracing` - Subscriber setup with env filtering
//! - `FallbackTrace` - Per-request record of every backend attempt

mod logging;
mod metrics;

pub use logging::*;
pub use metrics::*;
