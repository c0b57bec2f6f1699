//! Observability setup for OC Forge: structured logging with an optional
//! OpenTelemetry span bridge.

pub mod tracing_setup;
