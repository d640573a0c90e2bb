//! Platform dispatch and build-context events

use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Events emitted while generating Dockerfiles and streaming build contexts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PlatformEvent {
    /// A Dockerfile was assembled for a chaincode
    DockerfileGenerated {
        /// Platform type the Dockerfile was generated by
        platform_type: String,
        /// Chaincode identity (`name:version`)
        chaincode: String,
        /// Number of lines in the assembled Dockerfile
        lines: usize,
    },

    /// A build-context producer started
    BuildContextStarted {
        platform_type: String,
        chaincode: String,
    },

    /// A build-context producer closed its stream without error
    BuildContextCompleted {
        platform_type: String,
        chaincode: String,
        /// Static entries written ahead of the platform's own contribution
        static_entries: usize,
        /// Compressed bytes handed to the reader
        bytes_written: u64,
    },

    /// A build-context producer terminated its stream with an error
    BuildContextFailed {
        platform_type: String,
        chaincode: String,
        failure: FailureContext,
    },
}
