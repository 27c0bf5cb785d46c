//! Render surface port.
//!
//! The turn engine never writes to the terminal directly; it calls a
//! [`RenderSurface`]. The CLI provides the terminal implementation and tests
//! provide recording fakes. A failed render is reported to the caller, who
//! logs it and carries on -- rendering never aborts a turn.

use std::path::Path;
use std::sync::Arc;

use chefbot_types::error::RenderError;
use chefbot_types::turn::Turn;

pub trait RenderSurface: Send + Sync {
    /// Called once before the first partial render of a turn.
    fn begin_stream(&self) {}

    /// Show the answer accumulated so far. `text` always starts with the
    /// text passed on the previous call for the same turn.
    fn render_partial(&self, text: &str) -> Result<(), RenderError>;

    /// Show a finished turn: prompt, full answer, and artifact preview.
    fn render_turn(&self, turn: &Turn) -> Result<(), RenderError>;

    /// Show the last `window` turns as a compact table.
    fn render_history(&self, turns: &[Arc<Turn>], window: usize) -> Result<(), RenderError>;

    /// Show a preview of a generated artifact.
    fn render_artifact_preview(&self, path: &Path) -> Result<(), RenderError>;
}
