//! Turn engine and port definitions for Chefbot.
//!
//! This crate defines the "ports" (provider and render traits) that the
//! infrastructure and CLI layers implement, plus the conversation-turn
//! engine that drives them. It depends only on `chefbot-types` -- never on
//! `chefbot-infra` or any HTTP/terminal crate.

pub mod chat;
pub mod image;
pub mod llm;
pub mod render;
pub mod turn;
