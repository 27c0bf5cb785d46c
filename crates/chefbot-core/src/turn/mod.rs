//! The conversation-turn engine.
//!
//! A turn streams the model's answer through the [`collector`], lets the
//! [`trigger`] fire at most one image request mid-stream, reconciles both
//! results in the [`orchestrator`], and registers every produced file with
//! the [`artifacts`] release list.

pub mod artifacts;
pub mod collector;
pub mod orchestrator;
pub mod trigger;
