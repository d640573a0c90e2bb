//! Configuration sections shared by the registry and the build-context stream

use crate::constants;
use serde::{Deserialize, Serialize};

/// Metadata written into the `LABEL` and `ENV` directives of every Dockerfile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeConfig {
    #[serde(default = "default_label_prefix")]
    pub label_prefix: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_base_version")]
    pub base_version: String,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            label_prefix: default_label_prefix(),
            version: default_version(),
            base_version: default_base_version(),
        }
    }
}

/// Tuning for the producer/consumer build-context stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Chunks buffered between producer and reader before the producer blocks
    #[serde(default = "default_buffer_chunks")]
    pub buffer_chunks: usize,
    /// gzip compression level, 0-9
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            buffer_chunks: default_buffer_chunks(),
            compression_level: default_compression_level(),
        }
    }
}

// Default value functions for serde
fn default_label_prefix() -> String {
    constants::BASE_DOCKER_LABEL.to_string()
}

fn default_version() -> String {
    constants::VERSION.to_string()
}

fn default_base_version() -> String {
    constants::BASE_VERSION.to_string()
}

fn default_buffer_chunks() -> usize {
    constants::CONTEXT_BUFFER_CHUNKS
}

fn default_compression_level() -> u32 {
    constants::COMPRESSION_LEVEL
}
