//! Infrastructure adapters for Chefbot.
//!
//! Implements the `chefbot-core` provider ports against real services
//! (an OpenAI-compatible chat API and the Stability AI image API), and
//! loads configuration and credentials from disk and the environment.

pub mod config;
pub mod image;
pub mod llm;
pub mod secret;
