//! Shared domain types for ballgen.
//!
//! This crate contains the data model flowing through the generation
//! pipeline: content requests, normalized content, rendered documents,
//! backend request/response shapes, configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, schemars, thiserror.

pub mod config;
pub mod content;
pub mod error;
pub mod image;
pub mod llm;
pub mod record;
