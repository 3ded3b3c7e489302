//! Channel identifiers and normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved bucket for events recorded without a usable channel id.
pub const UNKNOWN_CHANNEL: &str = "unknown";

/// Opaque identifier for a logical message channel (e.g. a bus address).
///
/// Empty or whitespace-only ids normalize to the reserved `"unknown"`
/// bucket, so counter mutation is total over its input domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self(UNKNOWN_CHANNEL.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_well_formed_ids() {
        assert_eq!(ChannelId::normalize("worker.task").as_str(), "worker.task");
    }

    #[test]
    fn normalizes_empty_to_unknown() {
        assert_eq!(ChannelId::normalize("").as_str(), UNKNOWN_CHANNEL);
        assert_eq!(ChannelId::normalize("   ").as_str(), UNKNOWN_CHANNEL);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(ChannelId::normalize(" demo ").as_str(), "demo");
    }
}
