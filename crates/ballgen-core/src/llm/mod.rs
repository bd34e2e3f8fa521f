//! Text backend abstractions.
//!
//! - `TextProvider`: RPITIT trait for concrete backend implementations
//! - `BoxTextProvider`: object-safe wrapper for runtime backend selection

pub mod box_provider;
pub mod provider;
