//! Conversation state shared across turns: the running message context and
//! the append-only record of completed turns.

pub mod context;
pub mod store;
