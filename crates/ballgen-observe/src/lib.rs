//! Observability setup for ballgen: the tracing subscriber and the span
//! attribute names used when instrumenting generation calls.

pub mod genai_attrs;
pub mod tracing_setup;
