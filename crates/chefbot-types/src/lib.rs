//! Shared domain types for Chefbot.
//!
//! This crate contains the types that flow between the turn engine, the
//! provider adapters, and the terminal front end: turns, chat messages,
//! stream events, image requests, configuration, chef personas, and their
//! error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod image;
pub mod llm;
pub mod persona;
pub mod turn;
