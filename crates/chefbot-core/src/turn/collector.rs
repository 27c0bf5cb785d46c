//! Streaming response collector.
//!
//! Consumes the chat stream in arrival order, appends each fragment to the
//! turn's accumulator, lets an observer (the side-effect trigger) look at
//! the accumulated text, and pushes throttled partial renders to the
//! surface. Renders between refresh ticks are coalesced: a tick always
//! shows the latest text, and whatever is still unrendered when the stream
//! stops is flushed, so the last partial render always equals the full
//! concatenation.

use std::time::Duration;

use futures_util::{Stream, StreamExt};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use chefbot_types::error::TurnError;
use chefbot_types::llm::{LlmError, StopReason, StreamEvent, Usage};
use chefbot_types::turn::InterruptReason;

use crate::render::RenderSurface;

/// Receives the accumulated answer after every fragment.
pub trait AccumulationObserver {
    fn observe(&mut self, accumulated: &str);
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl AccumulationObserver for NoopObserver {
    fn observe(&mut self, _accumulated: &str) {}
}

/// Per-turn text buffer with a cursor over what has been rendered.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    rendered: usize,
    last_render: Option<Instant>,
}

impl StreamAccumulator {
    pub fn push(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bytes already shown on the surface.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    pub fn has_pending(&self) -> bool {
        self.rendered < self.text.len()
    }

    fn render_due(&self, now: Instant, interval: Duration) -> bool {
        self.has_pending()
            && self
                .last_render
                .is_none_or(|last| now.duration_since(last) >= interval)
    }

    /// When held-back text becomes due, if any is waiting on a tick.
    fn next_render_at(&self, interval: Duration) -> Option<Instant> {
        match self.last_render {
            Some(last) if self.has_pending() => Some(last + interval),
            _ => None,
        }
    }

    fn mark_rendered(&mut self, now: Instant) {
        self.rendered = self.text.len();
        self.last_render = Some(now);
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Final result of a fully consumed stream.
#[derive(Debug, Clone, Default)]
pub struct CollectedStream {
    pub text: String,
    pub usage: Option<Usage>,
    pub stop_reason: Option<StopReason>,
}

/// Drives one chat stream to completion against a render surface.
pub struct StreamCollector<'a> {
    surface: &'a dyn RenderSurface,
    refresh_interval: Duration,
    render_failures: u32,
}

impl<'a> StreamCollector<'a> {
    pub fn new(surface: &'a dyn RenderSurface, refresh_interval: Duration) -> Self {
        Self {
            surface,
            refresh_interval,
            render_failures: 0,
        }
    }

    /// Consume `stream` until end-of-stream, a transport error, or `cancel`.
    ///
    /// Returns [`TurnError::StreamInterrupted`] carrying the text accumulated
    /// so far on transport error or cancellation. No retry is attempted.
    pub async fn collect<S>(
        &mut self,
        mut stream: S,
        observer: &mut dyn AccumulationObserver,
        cancel: &CancellationToken,
    ) -> Result<CollectedStream, TurnError>
    where
        S: Stream<Item = Result<StreamEvent, LlmError>> + Unpin,
    {
        let mut acc = StreamAccumulator::default();
        let mut usage = None;
        let mut stop_reason = None;
        let mut fragments: u64 = 0;

        loop {
            let tick = acc.next_render_at(self.refresh_interval);
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.flush(&mut acc);
                    debug!(fragments, "stream cancelled");
                    return Err(interrupted(acc, InterruptReason::Cancelled));
                }
                next = stream.next() => next,
                _ = tokio::time::sleep_until(tick.unwrap_or_else(Instant::now)), if tick.is_some() => {
                    self.render(&mut acc, Instant::now());
                    continue;
                }
            };

            match next {
                Some(Ok(StreamEvent::TextDelta { text })) => {
                    fragments += 1;
                    acc.push(&text);
                    observer.observe(acc.text());
                    let now = Instant::now();
                    if acc.render_due(now, self.refresh_interval) {
                        self.render(&mut acc, now);
                    }
                }
                Some(Ok(StreamEvent::Usage(u))) => usage = Some(u),
                Some(Ok(StreamEvent::MessageDelta { stop_reason: sr })) => stop_reason = Some(sr),
                Some(Ok(StreamEvent::Connected)) => {}
                Some(Ok(StreamEvent::Done)) | None => break,
                Some(Err(e)) => {
                    self.flush(&mut acc);
                    warn!(error = %e, fragments, "chat stream failed mid-answer");
                    return Err(interrupted(acc, InterruptReason::Transport(e.to_string())));
                }
            }
        }

        self.flush(&mut acc);
        debug!(fragments, bytes = acc.text().len(), "stream complete");
        Ok(CollectedStream {
            text: acc.into_text(),
            usage,
            stop_reason,
        })
    }

    fn flush(&mut self, acc: &mut StreamAccumulator) {
        if acc.has_pending() {
            self.render(acc, Instant::now());
        }
    }

    fn render(&mut self, acc: &mut StreamAccumulator, now: Instant) {
        if let Err(e) = self.surface.render_partial(acc.text()) {
            self.render_failures += 1;
            if self.render_failures == 1 {
                warn!(error = %e, "partial render failed");
            }
        }
        acc.mark_rendered(now);
    }
}

fn interrupted(acc: StreamAccumulator, reason: InterruptReason) -> TurnError {
    TurnError::StreamInterrupted {
        partial: acc.into_text(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use chefbot_types::error::RenderError;
    use chefbot_types::turn::Turn;
    use futures_util::stream;

    #[derive(Default)]
    struct RecordingSurface {
        partials: Mutex<Vec<String>>,
    }

    impl RenderSurface for RecordingSurface {
        fn render_partial(&self, text: &str) -> Result<(), RenderError> {
            self.partials.lock().unwrap().push(text.to_string());
            Ok(())
        }

        fn render_turn(&self, _turn: &Turn) -> Result<(), RenderError> {
            Ok(())
        }

        fn render_history(&self, _turns: &[Arc<Turn>], _window: usize) -> Result<(), RenderError> {
            Ok(())
        }

        fn render_artifact_preview(&self, _path: &Path) -> Result<(), RenderError> {
            Ok(())
        }
    }

    struct FailingSurface;

    impl RenderSurface for FailingSurface {
        fn render_partial(&self, _text: &str) -> Result<(), RenderError> {
            Err(RenderError::Io(std::io::Error::other("closed")))
        }

        fn render_turn(&self, _turn: &Turn) -> Result<(), RenderError> {
            Ok(())
        }

        fn render_history(&self, _turns: &[Arc<Turn>], _window: usize) -> Result<(), RenderError> {
            Ok(())
        }

        fn render_artifact_preview(&self, _path: &Path) -> Result<(), RenderError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct SeenObserver {
        seen: Vec<String>,
    }

    impl AccumulationObserver for SeenObserver {
        fn observe(&mut self, accumulated: &str) {
            self.seen.push(accumulated.to_string());
        }
    }

    fn deltas(parts: &[&str]) -> Vec<Result<StreamEvent, LlmError>> {
        let mut events = vec![Ok(StreamEvent::Connected)];
        events.extend(parts.iter().map(|p| {
            Ok(StreamEvent::TextDelta {
                text: p.to_string(),
            })
        }));
        events.push(Ok(StreamEvent::Done));
        events
    }

    #[tokio::test]
    async fn final_render_equals_concatenation() {
        let surface = RecordingSurface::default();
        let mut collector = StreamCollector::new(&surface, Duration::ZERO);
        let parts = ["Ciao", ", ", "ecco ", "la ", "ricetta"];

        let collected = collector
            .collect(
                stream::iter(deltas(&parts)),
                &mut NoopObserver,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(collected.text, "Ciao, ecco la ricetta");
        let partials = surface.partials.lock().unwrap();
        assert_eq!(partials.len(), parts.len());
        assert_eq!(partials.last().unwrap(), "Ciao, ecco la ricetta");
        // Each render extends the previous one.
        for pair in partials.windows(2) {
            assert!(pair[1].starts_with(&pair[0]));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn renders_are_coalesced_within_refresh_interval() {
        let surface = RecordingSurface::default();
        let mut collector = StreamCollector::new(&surface, Duration::from_millis(100));

        // Time is paused, so every fragment arrives within the same tick.
        let collected = collector
            .collect(
                stream::iter(deltas(&["a", "b", "c", "d"])),
                &mut NoopObserver,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(collected.text, "abcd");
        let partials = surface.partials.lock().unwrap();
        // First fragment renders immediately, the rest flush once at the end.
        assert_eq!(*partials, vec!["a".to_string(), "abcd".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn held_back_text_renders_on_the_next_tick() {
        let surface = RecordingSurface::default();
        let cancel = CancellationToken::new();
        let stream = Box::pin(async_stream::stream! {
            yield Ok(StreamEvent::TextDelta { text: "a".to_string() });
            tokio::time::sleep(Duration::from_millis(10)).await;
            yield Ok(StreamEvent::TextDelta { text: "b".to_string() });
            tokio::time::sleep(Duration::from_secs(5)).await;
            yield Ok(StreamEvent::Done);
        });

        let mut observer = NoopObserver;
        let mut collector = StreamCollector::new(&surface, Duration::from_millis(100));
        let (result, mid_stream) = tokio::join!(
            collector.collect(stream, &mut observer, &cancel),
            async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                surface.partials.lock().unwrap().last().cloned()
            }
        );

        // The stream was still paused at two seconds.
        assert_eq!(mid_stream.as_deref(), Some("ab"));
        let collected = result.unwrap();
        assert_eq!(collected.text, "ab");
        assert_eq!(*surface.partials.lock().unwrap(), vec!["a".to_string(), "ab".to_string()]);
    }

    #[tokio::test]
    async fn observer_sees_every_accumulation_in_order() {
        let surface = RecordingSurface::default();
        let mut collector = StreamCollector::new(&surface, Duration::ZERO);
        let mut observer = SeenObserver::default();

        collector
            .collect(
                stream::iter(deltas(&["Here", " are", " the", " ingredients", " list"])),
                &mut observer,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            observer.seen,
            vec![
                "Here",
                "Here are",
                "Here are the",
                "Here are the ingredients",
                "Here are the ingredients list"
            ]
        );
    }

    #[tokio::test]
    async fn zero_fragments_yield_empty_text() {
        let surface = RecordingSurface::default();
        let mut collector = StreamCollector::new(&surface, Duration::ZERO);

        let collected = collector
            .collect(
                stream::iter(deltas(&[])),
                &mut NoopObserver,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(collected.text.is_empty());
        assert!(surface.partials.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn exhausted_stream_without_done_completes() {
        let surface = RecordingSurface::default();
        let mut collector = StreamCollector::new(&surface, Duration::ZERO);
        let events = vec![Ok(StreamEvent::TextDelta {
            text: "solo".to_string(),
        })];

        let collected = collector
            .collect(stream::iter(events), &mut NoopObserver, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(collected.text, "solo");
    }

    #[tokio::test]
    async fn transport_error_carries_partial_text() {
        let surface = RecordingSurface::default();
        let mut collector = StreamCollector::new(&surface, Duration::from_secs(60));
        let events = vec![
            Ok(StreamEvent::TextDelta {
                text: "Half ".to_string(),
            }),
            Ok(StreamEvent::TextDelta {
                text: "an answer".to_string(),
            }),
            Err(LlmError::Stream("connection reset".to_string())),
            Ok(StreamEvent::TextDelta {
                text: "never seen".to_string(),
            }),
        ];

        let err = collector
            .collect(stream::iter(events), &mut NoopObserver, &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            TurnError::StreamInterrupted { partial, reason } => {
                assert_eq!(partial, "Half an answer");
                assert!(matches!(reason, InterruptReason::Transport(msg) if msg.contains("connection reset")));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Pending text was flushed before returning.
        assert_eq!(surface.partials.lock().unwrap().last().unwrap(), "Half an answer");
    }

    #[tokio::test]
    async fn cancellation_stops_consumption() {
        let surface = RecordingSurface::default();
        let mut collector = StreamCollector::new(&surface, Duration::ZERO);
        let cancel = CancellationToken::new();
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Result<StreamEvent, LlmError>>();
        let stream = tokio_stream_from(rx);

        tx.send(Ok(StreamEvent::TextDelta {
            text: "partial".to_string(),
        }))
        .unwrap();

        let cancel_clone = cancel.clone();
        let handle = tokio::spawn(async move {
            tokio::task::yield_now().await;
            cancel_clone.cancel();
        });

        let err = collector
            .collect(stream, &mut NoopObserver, &cancel)
            .await
            .unwrap_err();
        handle.await.unwrap();

        match err {
            TurnError::StreamInterrupted { partial, reason } => {
                assert_eq!(partial, "partial");
                assert_eq!(reason, InterruptReason::Cancelled);
            }
            other => panic!("unexpected error: {other}"),
        }
        drop(tx);
    }

    #[tokio::test]
    async fn render_failures_do_not_abort_the_stream() {
        let mut collector = StreamCollector::new(&FailingSurface, Duration::ZERO);
        let collected = collector
            .collect(
                stream::iter(deltas(&["still ", "fine"])),
                &mut NoopObserver,
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(collected.text, "still fine");
        assert_eq!(collector.render_failures, 2);
    }

    #[tokio::test]
    async fn usage_and_stop_reason_are_captured() {
        let surface = RecordingSurface::default();
        let mut collector = StreamCollector::new(&surface, Duration::ZERO);
        let events = vec![
            Ok(StreamEvent::TextDelta {
                text: "ok".to_string(),
            }),
            Ok(StreamEvent::MessageDelta {
                stop_reason: StopReason::EndTurn,
            }),
            Ok(StreamEvent::Usage(Usage {
                input_tokens: 12,
                output_tokens: 3,
            })),
            Ok(StreamEvent::Done),
        ];

        let collected = collector
            .collect(stream::iter(events), &mut NoopObserver, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(collected.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(collected.usage.unwrap().output_tokens, 3);
    }

    /// Adapt an mpsc receiver into a stream without pulling in tokio-stream.
    fn tokio_stream_from(
        mut rx: tokio::sync::mpsc::UnboundedReceiver<Result<StreamEvent, LlmError>>,
    ) -> std::pin::Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>> {
        Box::pin(async_stream::stream! {
            while let Some(item) = rx.recv().await {
                yield item;
            }
        })
    }
}
