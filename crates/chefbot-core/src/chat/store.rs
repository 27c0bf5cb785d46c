//! Append-only record of completed turns.
//!
//! Insertion order is chronological order. Turns are shared as `Arc<Turn>`
//! so the history view and the caller can hold them without copying, and
//! nothing can mutate a turn once it is recorded.

use std::sync::Arc;

use chefbot_types::turn::Turn;

/// Ordered, append-only list of turns for one session.
#[derive(Debug, Default)]
pub struct TurnStore {
    turns: Vec<Arc<Turn>>,
}

impl TurnStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return the shared handle to it.
    pub fn push(&mut self, turn: Turn) -> Arc<Turn> {
        let turn = Arc::new(turn);
        self.turns.push(Arc::clone(&turn));
        turn
    }

    /// Look up a turn by its 0-based position.
    pub fn get(&self, index: usize) -> Option<&Arc<Turn>> {
        self.turns.get(index)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn as_slice(&self) -> &[Arc<Turn>] {
        &self.turns
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Turn>> {
        self.turns.iter()
    }
}

/// The last `window` turns of `turns`, paired with the 0-based index of the
/// first one.
pub fn recent_window(turns: &[Arc<Turn>], window: usize) -> (usize, &[Arc<Turn>]) {
    let start = turns.len().saturating_sub(window);
    (start, &turns[start..])
}
