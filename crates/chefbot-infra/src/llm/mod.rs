//! Chat provider adapters.

pub mod openai_compat;
