//! Turn orchestrator: drives one prompt through streaming, the optional
//! side request, and recording.
//!
//! Phases: `Submitted -> Streaming -> AwaitingArtifact -> Finalizing ->
//! Recorded`. `AwaitingArtifact` is skipped when the trigger never fired or
//! its result already arrived. Every path ends in `Recorded`: an interrupted
//! or failed stream still produces a turn carrying the partial answer.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use chefbot_types::config::ChefConfig;
use chefbot_types::error::TurnError;
use chefbot_types::llm::{CompletionRequest, Usage};
use chefbot_types::turn::{InterruptReason, Turn, TurnOutcome};

use crate::chat::context::ConversationContext;
use crate::chat::store::TurnStore;
use crate::image::box_provider::BoxImageProvider;
use crate::llm::provider::LlmProvider;
use crate::render::RenderSurface;

use super::artifacts::{ArtifactRegistry, ReleaseReport};
use super::collector::StreamCollector;
use super::trigger::{ArtifactOutcome, SideEffectTrigger, TriggerPredicate};

/// Lifecycle phase of a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Submitted,
    Streaming,
    AwaitingArtifact,
    Finalizing,
    Recorded,
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnPhase::Submitted => write!(f, "submitted"),
            TurnPhase::Streaming => write!(f, "streaming"),
            TurnPhase::AwaitingArtifact => write!(f, "awaiting_artifact"),
            TurnPhase::Finalizing => write!(f, "finalizing"),
            TurnPhase::Recorded => write!(f, "recorded"),
        }
    }
}

/// Per-session knobs the orchestrator needs from configuration.
#[derive(Debug, Clone)]
pub struct TurnSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub refresh_interval: Duration,
    pub artifact_wait: Duration,
}

impl TurnSettings {
    pub fn from_config(config: &ChefConfig) -> Self {
        Self {
            model: config.chat.model.clone(),
            max_tokens: config.chat.max_tokens,
            temperature: config.chat.temperature,
            refresh_interval: config.display.refresh_interval(),
            artifact_wait: config.image.artifact_wait(),
        }
    }
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self::from_config(&ChefConfig::default())
    }
}

/// What a finished turn hands back to the session loop.
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub turn: Arc<Turn>,
    /// Token usage, when the provider reported it before the stream ended.
    pub usage: Option<Usage>,
}

pub struct TurnOrchestrator {
    chat: Arc<dyn LlmProvider>,
    images: Option<Arc<BoxImageProvider>>,
    predicate: Arc<dyn TriggerPredicate>,
    settings: TurnSettings,
    store: TurnStore,
    artifacts: ArtifactRegistry,
}

impl TurnOrchestrator {
    pub fn new(
        chat: Arc<dyn LlmProvider>,
        predicate: Arc<dyn TriggerPredicate>,
        settings: TurnSettings,
    ) -> Self {
        Self {
            chat,
            images: None,
            predicate,
            settings,
            store: TurnStore::new(),
            artifacts: ArtifactRegistry::new(),
        }
    }

    /// Enable the side-channel image request.
    pub fn with_images(mut self, images: Arc<BoxImageProvider>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn store(&self) -> &TurnStore {
        &self.store
    }

    pub fn artifacts(&self) -> &ArtifactRegistry {
        &self.artifacts
    }

    pub fn settings(&self) -> &TurnSettings {
        &self.settings
    }

    pub fn images_enabled(&self) -> bool {
        self.images.is_some()
    }

    /// Delete every artifact produced this session. Safe to call repeatedly.
    pub fn release_artifacts(&self) -> ReleaseReport {
        self.artifacts.release_all()
    }

    /// Run one turn to completion and record it.
    ///
    /// Never fails: stream errors and cancellation yield an interrupted turn
    /// holding the partial answer, and image failures yield a turn without
    /// an artifact.
    pub async fn run_turn(
        &mut self,
        prompt: &str,
        context: &ConversationContext,
        surface: &dyn RenderSurface,
        cancel: &CancellationToken,
    ) -> TurnReport {
        let id = Uuid::now_v7();
        let span = info_span!("turn", turn_id = %id, model = %self.settings.model);
        self.run_turn_inner(id, prompt, context, surface, cancel)
            .instrument(span)
            .await
    }

    async fn run_turn_inner(
        &mut self,
        id: Uuid,
        prompt: &str,
        context: &ConversationContext,
        surface: &dyn RenderSurface,
        cancel: &CancellationToken,
    ) -> TurnReport {
        let started_at = Utc::now();
        enter(TurnPhase::Submitted);

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: context.messages_for(prompt),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            stream: true,
        };
        let mut trigger = SideEffectTrigger::new(
            prompt,
            Arc::clone(&self.predicate),
            self.images.clone(),
            self.artifacts.clone(),
        );

        enter(TurnPhase::Streaming);
        surface.begin_stream();
        let stream = self.chat.stream(request);
        let mut collector = StreamCollector::new(surface, self.settings.refresh_interval);
        let collected = collector.collect(stream, &mut trigger, cancel).await;

        let (answer, outcome, usage, artifact) = match collected {
            Ok(collected) => {
                if trigger.is_pending() {
                    enter(TurnPhase::AwaitingArtifact);
                }
                let artifact = trigger.resolve(self.settings.artifact_wait, cancel).await;
                (
                    collected.text,
                    TurnOutcome::Completed,
                    collected.usage,
                    artifact,
                )
            }
            Err(TurnError::StreamInterrupted { partial, reason }) => {
                debug!(%reason, partial_len = partial.len(), "turn interrupted");
                (
                    partial,
                    TurnOutcome::Interrupted { reason },
                    None,
                    trigger.take_ready(),
                )
            }
            Err(other) => (
                String::new(),
                TurnOutcome::Interrupted {
                    reason: InterruptReason::Transport(other.to_string()),
                },
                None,
                trigger.take_ready(),
            ),
        };

        enter(TurnPhase::Finalizing);
        let artifact_path = match artifact {
            ArtifactOutcome::Ready(path) => Some(path),
            ArtifactOutcome::NotTriggered | ArtifactOutcome::Unavailable(_) => None,
        };
        let turn = Turn {
            id,
            prompt: prompt.to_string(),
            answer,
            artifact_path,
            started_at,
            completed_at: Utc::now(),
            outcome,
        };
        if let Err(e) = surface.render_turn(&turn) {
            warn!(error = %TurnError::from(e), "failed to render turn");
        }

        let turn = self.store.push(turn);
        enter(TurnPhase::Recorded);
        TurnReport { turn, usage }
    }
}

fn enter(phase: TurnPhase) {
    debug!(%phase, "turn phase");
}
