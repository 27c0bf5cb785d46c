//! Interactive chat session.

pub mod ascii;
pub mod banner;
pub mod commands;
pub mod history;
pub mod input;
pub mod loop_runner;
pub mod renderer;
pub mod setup;
