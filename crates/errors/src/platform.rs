//! Platform dispatch and build-context errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors raised while routing operations to platform drivers or while
/// assembling a build context.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum PlatformError {
    #[error("multiple platforms of the same name specified: {name}")]
    DuplicatePlatformName { name: String },

    #[error("unknown chaincode type: {platform_type}")]
    UnknownPlatformType { platform_type: String },

    #[error("failed to generate platform-specific Dockerfile for {platform_type}: {message}")]
    GenerationError {
        platform_type: String,
        message: String,
    },

    #[error("failed to generate platform-specific docker build for {platform_type}: {message}")]
    ContributionFailed {
        platform_type: String,
        message: String,
    },

    #[error("failed to write \"{context}\" to build context: {message}")]
    StreamWriteError { context: String, message: String },
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DuplicatePlatformName { .. } => {
                Some("Register each chaincode platform exactly once.")
            }
            Self::UnknownPlatformType { .. } => {
                Some("Use a chaincode type that has a registered platform.")
            }
            Self::StreamWriteError { .. } => {
                Some("The build context consumer may have stopped reading; restart the build.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::DuplicatePlatformName { .. } => "platform.duplicate_name",
            Self::UnknownPlatformType { .. } => "platform.unknown_type",
            Self::GenerationError { .. } => "platform.generation_error",
            Self::ContributionFailed { .. } => "platform.contribution_failed",
            Self::StreamWriteError { .. } => "platform.stream_write_error",
        };
        Some(code)
    }
}
