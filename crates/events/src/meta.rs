use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Domain an event was raised in, attached to every traced event as `source`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct EventSource(Cow<'static, str>);

impl EventSource {
    pub const GENERAL: Self = Self(Cow::Borrowed("general"));
    pub const PLATFORM: Self = Self(Cow::Borrowed("platform"));

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
