use crate::reference::ContactReference;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a picker row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a candidate row stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    /// An existing conversation thread
    Conversation,
    /// A known contact
    Contact,
    /// Synthesized from the typed query: a recipient that does not exist yet
    Invite,
}

/// A selectable row in the picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,

    pub kind: CandidateKind,

    /// Primary display text
    pub display_name: String,

    /// Secondary display text shown under the name; never used to commit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_text: Option<String>,

    /// Token handed to the assignment workflow when this row is committed.
    /// Rows without one are inert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ContactReference>,

    /// Last activity in unix milliseconds (conversations only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<i64>,
}

impl Candidate {
    /// Create a candidate with no secondary text, reference or activity
    #[must_use]
    pub fn new(id: CandidateId, kind: CandidateKind, display_name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            display_name: display_name.into(),
            alternate_text: None,
            reference: None,
            last_activity: None,
        }
    }

    /// Synthesize the "invite new recipient" row for a parsed query
    #[must_use]
    pub fn invite(reference: ContactReference) -> Self {
        let token = reference.as_str().to_string();
        Self {
            id: CandidateId::new(format!("invite:{token}")),
            kind: CandidateKind::Invite,
            display_name: token.clone(),
            alternate_text: Some(token),
            reference: Some(reference),
            last_activity: None,
        }
    }

    /// Builder: set secondary display text
    #[must_use]
    pub fn alternate_text(mut self, text: impl Into<String>) -> Self {
        self.alternate_text = Some(text.into());
        self
    }

    /// Builder: set the resolvable reference
    #[must_use]
    pub fn reference(mut self, reference: ContactReference) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Builder: set last activity
    #[must_use]
    pub const fn last_activity(mut self, unix_ms: i64) -> Self {
        self.last_activity = Some(unix_ms);
        self
    }

    /// Whether activating this row can commit a selection
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        self.reference.is_some()
    }

    /// Text the query is matched against: name, secondary text and reference
    #[must_use]
    pub fn search_text(&self) -> String {
        let mut text = self.display_name.clone();
        for extra in [
            self.alternate_text.as_deref(),
            self.reference.as_ref().map(ContactReference::as_str),
        ]
        .into_iter()
        .flatten()
        {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(extra);
        }
        text
    }

    /// Case-folded display name used for alphabetical ordering
    #[must_use]
    pub fn sort_key(&self) -> String {
        self.display_name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn invite_carries_reference_in_typed_field() {
        let reference = ContactReference::Email("new.person@example.com".to_string());
        let invite = Candidate::invite(reference.clone());

        assert_eq!(invite.kind, CandidateKind::Invite);
        assert_eq!(invite.reference, Some(reference));
        assert_eq!(invite.id.as_str(), "invite:new.person@example.com");
        assert!(invite.is_selectable());
    }

    #[test]
    fn search_text_joins_name_and_tokens() {
        let candidate = Candidate::new(
            CandidateId::new("contact:1"),
            CandidateKind::Contact,
            "Alice Smith",
        )
        .alternate_text("Design")
        .reference(ContactReference::Email("alice@example.com".to_string()));

        assert_eq!(candidate.search_text(), "Alice Smith Design alice@example.com");
    }

    #[test]
    fn candidate_without_reference_is_inert() {
        let candidate = Candidate::new(CandidateId::new("c"), CandidateKind::Conversation, "Team");
        assert!(!candidate.is_selectable());
    }
}
