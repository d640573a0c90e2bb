use serde::{Deserialize, Serialize};

use crate::EventSource;
use ccbuild_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureContext {
    /// Optional stable error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod general;
pub mod platform;

pub use general::*;
pub use platform::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, debug output)
    General(GeneralEvent),

    /// Dockerfile generation and build-context streaming
    Platform(PlatformEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Platform(_) => EventSource::PLATFORM,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::Error { .. })
            | Self::Platform(PlatformEvent::BuildContextFailed { .. }) => Level::ERROR,

            Self::General(GeneralEvent::Warning { .. }) => Level::WARN,

            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Platform(PlatformEvent::DockerfileGenerated { .. }) => Level::DEBUG,

            Self::Platform(_) => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "ccbuild::events::general",
            Self::Platform(_) => "ccbuild::events::platform",
        }
    }

    /// Forward this event to the active `tracing` subscriber at its log level
    pub fn record(&self) {
        use tracing::Level;

        let source = self.event_source();
        let source = source.as_str();
        match self.log_level() {
            Level::ERROR => tracing::error!(target: "ccbuild::events", source, event = ?self),
            Level::WARN => tracing::warn!(target: "ccbuild::events", source, event = ?self),
            Level::INFO => tracing::info!(target: "ccbuild::events", source, event = ?self),
            Level::DEBUG => tracing::debug!(target: "ccbuild::events", source, event = ?self),
            Level::TRACE => tracing::trace!(target: "ccbuild::events", source, event = ?self),
        }
    }
}
