//! Process-wide release list for generated artifacts.
//!
//! Every artifact file is registered the moment it is produced, before the
//! turn that owns it is recorded, so an interrupted or failed turn cannot
//! leak it. [`ArtifactRegistry::release_all`] deletes each registered file
//! exactly once; after release the registry is closed and any late
//! registration (an image that finished after the session ended) is deleted
//! on the spot.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

#[derive(Debug, Default)]
struct RegistryState {
    paths: Vec<PathBuf>,
    released: bool,
}

/// Shared handle to the artifact release list. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct ArtifactRegistry {
    inner: Arc<Mutex<RegistryState>>,
}

/// Result of releasing all registered artifacts.
#[derive(Debug, Default)]
pub struct ReleaseReport {
    /// Files that were deleted.
    pub removed: Vec<PathBuf>,
    /// Files that were already gone.
    pub missing: Vec<PathBuf>,
    /// Files that could not be deleted.
    pub failed: Vec<(PathBuf, io::Error)>,
}

impl ReleaseReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a produced artifact.
    ///
    /// Returns `false` if the registry was already released; the file is then
    /// deleted immediately and must not be handed to a turn.
    pub fn register(&self, path: PathBuf) -> bool {
        let mut state = self.state();
        if state.released {
            drop(state);
            debug!(path = %path.display(), "artifact produced after release, deleting");
            if let Err(e) = remove_artifact(&path) {
                warn!(path = %path.display(), error = %e, "failed to delete late artifact");
            }
            return false;
        }
        if !state.paths.contains(&path) {
            debug!(path = %path.display(), "artifact registered");
            state.paths.push(path);
        }
        true
    }

    /// Paths currently awaiting release.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.state().paths.clone()
    }

    pub fn len(&self) -> usize {
        self.state().paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_released(&self) -> bool {
        self.state().released
    }

    /// Delete every registered artifact and close the registry.
    ///
    /// Idempotent: the list is drained, so a second call finds nothing to do.
    /// A failure on one file does not stop the others.
    pub fn release_all(&self) -> ReleaseReport {
        let paths = {
            let mut state = self.state();
            state.released = true;
            std::mem::take(&mut state.paths)
        };

        let mut report = ReleaseReport::default();
        for path in paths {
            match remove_artifact(&path) {
                Ok(()) => report.removed.push(path),
                Err(e) if e.kind() == io::ErrorKind::NotFound => report.missing.push(path),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to delete artifact");
                    report.failed.push((path, e));
                }
            }
        }
        if !report.removed.is_empty() {
            debug!(count = report.removed.len(), "artifacts released");
        }
        report
    }

    /// Scope guard that releases the registry when dropped.
    pub fn guard(&self) -> ArtifactGuard {
        ArtifactGuard {
            registry: self.clone(),
        }
    }
}

fn remove_artifact(path: &Path) -> io::Result<()> {
    std::fs::remove_file(path)
}

/// Releases all artifacts on drop, covering exit paths that skip the
/// explicit cleanup call (early returns, panics unwinding through the loop).
#[derive(Debug)]
pub struct ArtifactGuard {
    registry: ArtifactRegistry,
}

impl ArtifactGuard {
    /// Release now and return the report. Dropping afterwards is a no-op.
    pub fn release(&self) -> ReleaseReport {
        self.registry.release_all()
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        let _ = self.registry.release_all();
    }
}
