//! Image provider adapters.

pub mod stability;
