//! Image backend abstractions, mirroring [`crate::llm`].
//!
//! Backends differ in wire shape (single request vs. submit/poll/fetch) but
//! all of them surface as one awaitable `generate_image` call.

pub mod box_provider;
pub mod provider;
