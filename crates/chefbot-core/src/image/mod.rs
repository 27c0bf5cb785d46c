//! Image provider abstractions.
//!
//! - `ImageProvider`: RPITIT trait for concrete image backends
//! - `BoxImageProvider`: Object-safe wrapper for dynamic dispatch

pub mod box_provider;
pub mod provider;
