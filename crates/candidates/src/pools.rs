use crate::error::Result;
use crate::reference::ContactReference;
use crate::types::{Candidate, CandidateId, CandidateKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Feature flag that makes named rooms eligible as candidates
pub const CHAT_ROOMS_FLAG: &str = "chat_rooms";

/// Shape of a conversation thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKind {
    /// One-to-one conversation with a single participant
    #[default]
    Direct,
    /// Ad-hoc conversation with several participants
    Group,
    /// Named room
    Room,
}

/// A conversation as supplied by the candidate repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub kind: ConversationKind,
    /// Raw login of the other participant (direct conversations)
    #[serde(default)]
    pub participant: Option<String>,
    /// Last activity in unix milliseconds
    #[serde(default)]
    pub last_activity: i64,
    #[serde(default)]
    pub archived: bool,
}

impl Conversation {
    /// Project into a picker row. The participant login becomes the
    /// resolvable reference when it parses; otherwise the row is inert.
    #[must_use]
    pub fn to_candidate(&self, default_country_code: &str) -> Candidate {
        let mut candidate = Candidate::new(
            CandidateId::new(format!("conversation:{}", self.id)),
            CandidateKind::Conversation,
            self.display_name.clone(),
        )
        .last_activity(self.last_activity);

        if let Some(login) = self.participant.as_deref() {
            candidate = candidate.alternate_text(login);
            match ContactReference::parse(login, default_country_code) {
                Some(reference) => candidate = candidate.reference(reference),
                None => log::debug!(
                    "conversation {} has unresolvable participant login",
                    self.id
                ),
            }
        }

        candidate
    }
}

/// A contact as supplied by the candidate repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub display_name: String,
    /// Raw login (email or phone)
    pub login: String,
    /// Display-only secondary text; the login is shown when absent
    #[serde(default)]
    pub alternate_text: Option<String>,
}

impl Contact {
    #[must_use]
    pub fn to_candidate(&self, default_country_code: &str) -> Candidate {
        let display_name = if self.display_name.trim().is_empty() {
            self.login.clone()
        } else {
            self.display_name.clone()
        };
        let mut candidate = Candidate::new(
            CandidateId::new(format!("contact:{}", self.id)),
            CandidateKind::Contact,
            display_name,
        )
        .alternate_text(
            self.alternate_text
                .clone()
                .unwrap_or_else(|| self.login.clone()),
        );

        match ContactReference::parse(&self.login, default_country_code) {
            Some(reference) => candidate = candidate.reference(reference),
            None => log::debug!("contact {} has unresolvable login", self.id),
        }

        candidate
    }
}

/// Read-only snapshot of everything the picker can offer.
///
/// Any pool missing from the serialized form is treated as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePools {
    #[serde(default)]
    pub conversations: Vec<Conversation>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub feature_flags: BTreeSet<String>,
    /// The signed-in user, never offered as a candidate
    #[serde(default)]
    pub current_user: Option<String>,
}

impl CandidatePools {
    #[must_use]
    pub fn new(conversations: Vec<Conversation>, contacts: Vec<Contact>) -> Self {
        Self {
            conversations,
            contacts,
            ..Self::default()
        }
    }

    /// Builder: enable a feature flag
    #[must_use]
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.feature_flags.insert(flag.into());
        self
    }

    /// Builder: set the signed-in user's login
    #[must_use]
    pub fn with_current_user(mut self, login: impl Into<String>) -> Self {
        self.current_user = Some(login.into());
        self
    }

    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.feature_flags.contains(flag)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty() && self.contacts.is_empty()
    }

    /// The signed-in user's login, normalized
    #[must_use]
    pub fn current_user_reference(&self, default_country_code: &str) -> Option<ContactReference> {
        self.current_user
            .as_deref()
            .and_then(|login| ContactReference::parse(login, default_country_code))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let pools = Self::from_json_str(&raw)?;
        log::debug!(
            "loaded snapshot {}: {} conversations, {} contacts",
            path.display(),
            pools.conversations.len(),
            pools.contacts.len()
        );
        Ok(pools)
    }
}
