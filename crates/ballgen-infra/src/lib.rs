//! Infrastructure layer for ballgen.
//!
//! Contains implementations of the traits defined in `ballgen-core`:
//! Ollama and OpenAI text backends, ComfyUI and DALL-E image backends,
//! the local filesystem content store and the site deployer, plus the
//! TOML configuration loader.

pub mod config;
pub mod deploy;
pub mod image;
pub mod llm;
pub mod storage;
