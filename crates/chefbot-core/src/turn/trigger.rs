//! Side-effect trigger: fires one image request mid-stream.
//!
//! The trigger watches the accumulated answer. The first time its predicate
//! holds it spawns the image request on the runtime and moves to `Fired`;
//! from then on it never fires again for this turn. The spawned task hands
//! its result back through a oneshot channel, so the "has fired" state lives
//! only in the trigger that owns it.
//!
//! Image generation is best-effort: any failure resolves to no artifact.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use chefbot_types::config::{MatchMode, TriggerSettings};
use chefbot_types::error::TurnError;
use chefbot_types::image::ImageRequest;

use crate::image::box_provider::BoxImageProvider;

use super::artifacts::ArtifactRegistry;
use super::collector::AccumulationObserver;

/// Condition evaluated against the accumulated answer after every fragment.
pub trait TriggerPredicate: Send + Sync {
    fn is_satisfied(&self, accumulated: &str) -> bool;
}

/// Case-insensitive keyword predicate. Any keyword matching satisfies it.
#[derive(Debug, Clone)]
pub struct KeywordTrigger {
    keywords: Vec<String>,
    mode: MatchMode,
}

impl KeywordTrigger {
    pub fn new<I, S>(keywords: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords, mode }
    }

    pub fn from_settings(settings: &TriggerSettings) -> Self {
        Self::new(&settings.keywords, settings.match_mode)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl TriggerPredicate for KeywordTrigger {
    fn is_satisfied(&self, accumulated: &str) -> bool {
        if self.keywords.is_empty() {
            return false;
        }
        let haystack = accumulated.to_lowercase();
        self.keywords.iter().any(|keyword| match self.mode {
            MatchMode::Substring => haystack.contains(keyword.as_str()),
            MatchMode::WordBoundary => contains_word(&haystack, keyword),
        })
    }
}

/// The end of the text counts as a boundary, since more text may still be
/// streaming in.
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// An image request that has been fired and not yet collected.
struct PendingArtifact {
    result: oneshot::Receiver<Result<PathBuf, String>>,
    task: JoinHandle<()>,
}

enum TriggerState {
    Armed,
    Fired(PendingArtifact),
    Resolved(Result<PathBuf, String>),
    /// Matched with image generation disabled; no request was issued.
    Suppressed,
    Abandoned,
}

/// How the side request ended for a turn.
#[derive(Debug)]
pub enum ArtifactOutcome {
    /// No request was issued: the predicate never held, or generation is
    /// disabled.
    NotTriggered,
    /// The image was generated and registered for cleanup.
    Ready(PathBuf),
    /// The request failed, timed out, or was abandoned.
    Unavailable(TurnError),
}

impl ArtifactOutcome {
    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            ArtifactOutcome::Ready(path) => Some(path),
            _ => None,
        }
    }
}

/// Per-turn trigger. Create one for every turn.
pub struct SideEffectTrigger {
    prompt: String,
    predicate: Arc<dyn TriggerPredicate>,
    images: Option<Arc<BoxImageProvider>>,
    registry: ArtifactRegistry,
    state: TriggerState,
    trigger_text: Option<String>,
}

impl SideEffectTrigger {
    /// `images = None` disables generation: the predicate is still evaluated
    /// once, but firing issues no request.
    pub fn new(
        prompt: impl Into<String>,
        predicate: Arc<dyn TriggerPredicate>,
        images: Option<Arc<BoxImageProvider>>,
        registry: ArtifactRegistry,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            predicate,
            images,
            registry,
            state: TriggerState::Armed,
            trigger_text: None,
        }
    }

    pub fn has_fired(&self) -> bool {
        !matches!(self.state, TriggerState::Armed)
    }

    /// The accumulated text at the moment the trigger fired.
    pub fn trigger_text(&self) -> Option<&str> {
        self.trigger_text.as_deref()
    }

    /// True while a fired request has not delivered its result.
    pub fn is_pending(&mut self) -> bool {
        self.poll_ready();
        matches!(self.state, TriggerState::Fired(_))
    }

    fn fire(&mut self, accumulated: &str) {
        self.trigger_text = Some(accumulated.to_string());

        let Some(images) = self.images.clone() else {
            debug!("trigger matched but image generation is disabled");
            self.state = TriggerState::Suppressed;
            return;
        };

        info!(provider = images.name(), "content trigger matched, requesting image");
        let (tx, rx) = oneshot::channel();
        let registry = self.registry.clone();
        let request = ImageRequest::new(self.prompt.clone());

        let task = tokio::spawn(async move {
            let result = match images.generate(&request).await {
                Ok(image) => {
                    if registry.register(image.path.clone()) {
                        Ok(image.path)
                    } else {
                        Err("session already ended".to_string())
                    }
                }
                Err(e) => Err(e.to_string()),
            };
            let _ = tx.send(result);
        });

        self.state = TriggerState::Fired(PendingArtifact { result: rx, task });
    }

    /// Move a delivered result from the channel into the state.
    fn poll_ready(&mut self) {
        if let TriggerState::Fired(pending) = &mut self.state {
            match pending.result.try_recv() {
                Ok(result) => self.state = TriggerState::Resolved(result),
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.state =
                        TriggerState::Resolved(Err("image task ended without a result".to_string()));
                }
            }
        }
    }

    /// Wait for the side request, bounded by `ceiling` and by `cancel`.
    ///
    /// On timeout or cancellation the task is aborted and the artifact is
    /// treated as absent.
    pub async fn resolve(mut self, ceiling: Duration, cancel: &CancellationToken) -> ArtifactOutcome {
        self.poll_ready();
        let state = std::mem::replace(&mut self.state, TriggerState::Abandoned);
        let result = match state {
            TriggerState::Armed | TriggerState::Suppressed => return ArtifactOutcome::NotTriggered,
            TriggerState::Resolved(result) => result,
            TriggerState::Abandoned => Err("abandoned".to_string()),
            TriggerState::Fired(pending) => {
                let PendingArtifact { result, task } = pending;
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        task.abort();
                        Err("abandoned on interrupt".to_string())
                    }
                    received = tokio::time::timeout(ceiling, result) => match received {
                        Ok(Ok(result)) => result,
                        Ok(Err(_)) => Err("image task ended without a result".to_string()),
                        Err(_) => {
                            task.abort();
                            Err(format!("timed out after {}s", ceiling.as_secs_f32()))
                        }
                    },
                }
            }
        };
        into_outcome(result)
    }

    /// Take the artifact only if it has already arrived; abort otherwise.
    ///
    /// Used when the turn is interrupted and must not wait.
    pub fn take_ready(mut self) -> ArtifactOutcome {
        self.poll_ready();
        match std::mem::replace(&mut self.state, TriggerState::Abandoned) {
            TriggerState::Armed | TriggerState::Suppressed => ArtifactOutcome::NotTriggered,
            TriggerState::Resolved(result) => into_outcome(result),
            TriggerState::Fired(pending) => {
                pending.task.abort();
                into_outcome(Err("abandoned on interrupt".to_string()))
            }
            TriggerState::Abandoned => into_outcome(Err("abandoned".to_string())),
        }
    }
}

fn into_outcome(result: Result<PathBuf, String>) -> ArtifactOutcome {
    match result {
        Ok(path) => ArtifactOutcome::Ready(path),
        Err(reason) => {
            let err = TurnError::ArtifactUnavailable(reason);
            warn!(error = %err, "continuing without artifact");
            ArtifactOutcome::Unavailable(err)
        }
    }
}

impl AccumulationObserver for SideEffectTrigger {
    fn observe(&mut self, accumulated: &str) {
        if matches!(self.state, TriggerState::Armed) && self.predicate.is_satisfied(accumulated) {
            self.fire(accumulated);
        }
    }
}

impl Drop for SideEffectTrigger {
    fn drop(&mut self) {
        if let TriggerState::Fired(pending) = &self.state {
            pending.task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chefbot_types::image::{GeneratedImage, ImageError};

    use crate::image::provider::ImageProvider;

    #[test]
    fn substring_match_is_case_insensitive() {
        let trigger = KeywordTrigger::new(["Ingredients"], MatchMode::Substring);
        assert!(trigger.is_satisfied("Here are the INGREDIENTS:"));
        assert!(trigger.is_satisfied("ingredientsfoo"));
        assert!(!trigger.is_satisfied("Here are the steps"));
    }

    #[test]
    fn word_boundary_rejects_embedded_matches() {
        let trigger = KeywordTrigger::new(["ingredient"], MatchMode::WordBoundary);
        assert!(!trigger.is_satisfied("the ingredients are"));
        assert!(trigger.is_satisfied("one ingredient, two"));
        assert!(trigger.is_satisfied("main ingredient"));
    }

    #[test]
    fn any_keyword_satisfies() {
        let trigger = KeywordTrigger::new(["ingredients", "ingredientes"], MatchMode::Substring);
        assert!(trigger.is_satisfied("Los ingredientes"));
    }

    #[test]
    fn blank_keywords_never_match() {
        let trigger = KeywordTrigger::new(["", "  "], MatchMode::Substring);
        assert!(trigger.keywords().is_empty());
        assert!(!trigger.is_satisfied("anything at all"));
    }

    struct CountingImages {
        calls: Arc<AtomicUsize>,
        prompts: Arc<Mutex<Vec<String>>>,
        dir: PathBuf,
    }

    impl ImageProvider for CountingImages {
        fn name(&self) -> &str {
            "counting"
        }

        async fn generate(&self, request: &ImageRequest) -> Result<GeneratedImage, ImageError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.prompt.clone());
            let path = self.dir.join(format!("img-{n}.png"));
            std::fs::write(&path, b"png").map_err(|e| ImageError::Storage(e.to_string()))?;
            Ok(GeneratedImage { path })
        }
    }

    struct FailingImages;

    impl ImageProvider for FailingImages {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _request: &ImageRequest) -> Result<GeneratedImage, ImageError> {
            Err(ImageError::MissingCredential("STABILITY_KEY".to_string()))
        }
    }

    fn keyword() -> Arc<dyn TriggerPredicate> {
        Arc::new(KeywordTrigger::new(["ingredients"], MatchMode::Substring))
    }

    #[tokio::test]
    async fn fires_once_with_turn_prompt() {
        let dir = tempfile::TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let images = Arc::new(BoxImageProvider::new(CountingImages {
            calls: calls.clone(),
            prompts: prompts.clone(),
            dir: dir.path().to_path_buf(),
        }));
        let registry = ArtifactRegistry::new();
        let mut trigger =
            SideEffectTrigger::new("milanesa", keyword(), Some(images), registry.clone());

        trigger.observe("Here are the");
        assert!(!trigger.has_fired());
        trigger.observe("Here are the ingredients");
        trigger.observe("Here are the ingredients list");
        trigger.observe("Here are the ingredients list with more ingredients");
        assert!(trigger.has_fired());
        assert_eq!(trigger.trigger_text(), Some("Here are the ingredients"));

        let outcome = trigger
            .resolve(Duration::from_secs(5), &CancellationToken::new())
            .await;
        let path = outcome.into_path().expect("artifact");
        assert!(path.exists());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*prompts.lock().unwrap(), vec!["milanesa".to_string()]);
        assert_eq!(registry.paths(), vec![path]);
    }

    #[tokio::test]
    async fn never_fired_resolves_not_triggered() {
        let trigger =
            SideEffectTrigger::new("x", keyword(), None, ArtifactRegistry::new());
        let outcome = trigger
            .resolve(Duration::from_secs(1), &CancellationToken::new())
            .await;
        assert!(matches!(outcome, ArtifactOutcome::NotTriggered));
    }

    #[tokio::test]
    async fn provider_failure_resolves_unavailable() {
        let images = Arc::new(BoxImageProvider::new(FailingImages));
        let registry = ArtifactRegistry::new();
        let mut trigger = SideEffectTrigger::new("x", keyword(), Some(images), registry.clone());
        trigger.observe("ingredients");

        let outcome = trigger
            .resolve(Duration::from_secs(5), &CancellationToken::new())
            .await;
        match outcome {
            ArtifactOutcome::Unavailable(TurnError::ArtifactUnavailable(reason)) => {
                assert!(reason.contains("STABILITY_KEY"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn disabled_images_still_fire_once_without_request() {
        let mut trigger = SideEffectTrigger::new("x", keyword(), None, ArtifactRegistry::new());
        trigger.observe("ingredients");
        assert!(trigger.has_fired());
        assert!(!trigger.is_pending());
        assert!(matches!(trigger.take_ready(), ArtifactOutcome::NotTriggered));
    }
}
