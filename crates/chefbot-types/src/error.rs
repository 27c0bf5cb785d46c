use thiserror::Error;

use crate::turn::InterruptReason;

/// Errors raised by a render surface.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("artifact not found: {0}")]
    ArtifactMissing(String),

    #[error("could not decode artifact: {0}")]
    ArtifactDecode(String),

    #[error("terminal output failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure taxonomy inside a single turn.
///
/// None of these abort the session loop: an interrupted stream still
/// produces a recorded turn, an unavailable artifact resolves to no artifact,
/// and a render failure is reported inline.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("stream interrupted ({reason}) after {} bytes", .partial.len())]
    StreamInterrupted {
        partial: String,
        reason: InterruptReason,
    },

    #[error("artifact unavailable: {0}")]
    ArtifactUnavailable(String),

    #[error("render failure: {0}")]
    RenderFailure(#[from] RenderError),
}

/// Errors related to configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_interrupted_display_reports_partial_length() {
        let err = TurnError::StreamInterrupted {
            partial: "Here are".to_string(),
            reason: InterruptReason::Cancelled,
        };
        assert_eq!(
            err.to_string(),
            "stream interrupted (cancelled by user) after 8 bytes"
        );
    }

    #[test]
    fn render_error_converts_into_turn_error() {
        let err: TurnError = RenderError::ArtifactMissing("/tmp/x.png".to_string()).into();
        assert!(matches!(err, TurnError::RenderFailure(_)));
        assert!(err.to_string().contains("/tmp/x.png"));
    }
}
