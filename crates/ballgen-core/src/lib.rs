//! Business logic and backend trait definitions for ballgen.
//!
//! This crate defines the "ports" (text/image backends, content store,
//! deployer) that the infrastructure layer implements, plus every pure
//! stage of the pipeline: prompt building, response normalization,
//! sanitization and document rendering. It depends only on
//! `ballgen-types` -- never on `ballgen-infra` or any network/IO crate.

pub mod catalog;
pub mod image;
pub mod llm;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod publish;
pub mod render;
pub mod sanitize;
