use crate::query_classifier::QueryType;
use serde::{Deserialize, Serialize};

/// Message shown above the option list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMessage {
    /// Nothing to say: there is at least one row to pick
    #[default]
    None,
    NoResults,
    InvalidPhone,
    InvalidEmail,
}

impl StatusMessage {
    /// Pick the message from (has_results, has_invite, query) as one decision.
    ///
    /// An invite row counts as something to show, so it suppresses every
    /// message even when both ranked buckets are empty.
    #[must_use]
    pub fn decide(has_results: bool, has_invite: bool, query: &QueryType) -> Self {
        match (has_results || has_invite, query) {
            (true, _) => Self::None,
            (false, QueryType::MalformedPhone) => Self::InvalidPhone,
            (false, QueryType::MalformedEmail) => Self::InvalidEmail,
            (false, _) => Self::NoResults,
        }
    }

    /// Localization key, `None` for the empty message
    #[must_use]
    pub const fn translation_key(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::NoResults => Some("common.noResultsFound"),
            Self::InvalidPhone => Some("messages.errorMessageInvalidPhone"),
            Self::InvalidEmail => Some("messages.errorMessageInvalidEmail"),
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::None)
    }
}
