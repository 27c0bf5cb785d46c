//! Chat provider abstraction.
//!
//! - `LlmProvider`: object-safe trait for streaming chat backends

pub mod provider;
