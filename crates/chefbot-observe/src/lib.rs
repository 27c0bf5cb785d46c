//! Observability setup for Chefbot: the tracing subscriber and the GenAI
//! attribute names used on provider spans.

pub mod genai_attrs;
pub mod tracing_setup;
