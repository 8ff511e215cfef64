use crate::matcher::CandidateMatcher;
use crate::query_classifier::{QueryClassifier, QueryType};
use crate::status::StatusMessage;
use picker_candidates::{
    Candidate, CandidateId, CandidatePools, ContactReference, Conversation, ConversationKind,
    PickerConfig, CHAT_ROOMS_FLAG,
};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

/// Result of one filtering pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedOptions {
    /// Conversations, most recent first
    pub recents: Vec<Candidate>,
    /// Contacts not already covered by `recents`, alphabetical
    pub contacts: Vec<Candidate>,
    /// "Invite new recipient" row synthesized from the query
    pub invite: Option<Candidate>,
    pub status: StatusMessage,
}

impl ComputedOptions {
    #[must_use]
    pub fn has_results(&self) -> bool {
        !self.recents.is_empty() || !self.contacts.is_empty()
    }

    /// Rows across all buckets, invite included
    #[must_use]
    pub fn total(&self) -> usize {
        self.recents.len() + self.contacts.len() + usize::from(self.invite.is_some())
    }
}

/// Maps (pools, query, exclusions) to ranked buckets.
///
/// Deterministic: the same inputs always produce the same output. The only
/// state is the matcher's scratch space.
pub struct OptionRanker {
    config: PickerConfig,
    matcher: CandidateMatcher,
}

impl OptionRanker {
    #[must_use]
    pub fn new(config: PickerConfig) -> Self {
        Self {
            config,
            matcher: CandidateMatcher::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Filter and rank the pools for `query`.
    ///
    /// `excluded` holds normalized reference tokens that must never be
    /// offered, including as an invite. A query that parses as a contact
    /// reference also matches every candidate resolving to that reference,
    /// whatever format it was typed in.
    pub fn compute_options(
        &mut self,
        pools: &CandidatePools,
        query: &str,
        excluded: &HashSet<String>,
    ) -> ComputedOptions {
        let Self { config, matcher } = self;
        let config = &*config;
        let country_code = config.default_country_code.as_str();

        let query = query.trim();
        let query_type = QueryClassifier::classify(query, country_code);
        let query_reference = query_type.reference();
        let compiled = CandidateMatcher::compile(query);

        let current_user = pools.current_user_reference(country_code);
        let blocked = |reference: Option<&ContactReference>| {
            reference.is_some_and(|r| {
                excluded.contains(r.as_str()) || current_user.as_ref() == Some(r)
            })
        };
        let mut accept = |candidate: &Candidate| {
            compiled.is_match_all()
                || (query_reference.is_some() && candidate.reference.as_ref() == query_reference)
                || matcher.is_match(&compiled, candidate)
        };

        let mut seen: HashSet<CandidateId> = HashSet::new();

        let mut recents: Vec<Candidate> = Vec::new();
        for conversation in &pools.conversations {
            if !conversation_eligible(config, pools, conversation) {
                continue;
            }
            let candidate = conversation.to_candidate(country_code);
            if blocked(candidate.reference.as_ref()) || !accept(&candidate) {
                continue;
            }
            if seen.insert(candidate.id.clone()) {
                recents.push(candidate);
            }
        }
        recents.sort_by(|a, b| {
            Reverse(a.last_activity)
                .cmp(&Reverse(b.last_activity))
                .then_with(|| a.id.cmp(&b.id))
        });
        recents.truncate(config.max_recents);

        let covered: HashSet<&ContactReference> = recents
            .iter()
            .filter_map(|c| c.reference.as_ref())
            .collect();

        let mut contacts: Vec<Candidate> = Vec::new();
        for contact in &pools.contacts {
            let candidate = contact.to_candidate(country_code);
            if blocked(candidate.reference.as_ref())
                || candidate
                    .reference
                    .as_ref()
                    .is_some_and(|r| covered.contains(r))
                || !accept(&candidate)
            {
                continue;
            }
            if seen.insert(candidate.id.clone()) {
                contacts.push(candidate);
            }
        }
        contacts.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()).then_with(|| a.id.cmp(&b.id)));
        contacts.truncate(config.max_contacts);

        let invite = query_reference
            .filter(|reference| !blocked(Some(*reference)))
            .filter(|reference| !reference_known(pools, reference, country_code))
            .cloned()
            .map(Candidate::invite);

        let status = StatusMessage::decide(
            !recents.is_empty() || !contacts.is_empty(),
            invite.is_some(),
            &query_type,
        );

        log::debug!(
            "compute_options: query={:?} recents={} contacts={} invite={} status={:?}",
            query,
            recents.len(),
            contacts.len(),
            invite.is_some(),
            status
        );

        ComputedOptions {
            recents,
            contacts,
            invite,
            status,
        }
    }
}

fn conversation_eligible(
    config: &PickerConfig,
    pools: &CandidatePools,
    conversation: &Conversation,
) -> bool {
    if conversation.archived {
        return false;
    }
    match conversation.kind {
        ConversationKind::Direct => true,
        ConversationKind::Group => config.include_group_conversations,
        ConversationKind::Room => pools.has_flag(CHAT_ROOMS_FLAG),
    }
}

/// Whether any candidate in the pools, eligible or not, already resolves
/// to `reference`
fn reference_known(
    pools: &CandidatePools,
    reference: &ContactReference,
    country_code: &str,
) -> bool {
    let conversation_logins = pools
        .conversations
        .iter()
        .filter_map(|c| c.participant.as_deref());
    let contact_logins = pools.contacts.iter().map(|c| c.login.as_str());

    conversation_logins
        .chain(contact_logins)
        .filter_map(|login| ContactReference::parse(login, country_code))
        .any(|known| &known == reference)
}

impl Default for OptionRanker {
    fn default() -> Self {
        Self::new(PickerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picker_candidates::Contact;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn direct(id: &str, name: &str, login: &str, last_activity: i64) -> Conversation {
        Conversation {
            id: id.to_string(),
            display_name: name.to_string(),
            kind: ConversationKind::Direct,
            participant: Some(login.to_string()),
            last_activity,
            archived: false,
        }
    }

    fn contact(id: &str, name: &str, login: &str) -> Contact {
        Contact {
            id: id.to_string(),
            display_name: name.to_string(),
            login: login.to_string(),
            alternate_text: None,
        }
    }

    fn sample_pools() -> CandidatePools {
        CandidatePools::new(
            vec![
                direct("r1", "Alice", "alice@example.com", 100),
                direct("r2", "Bob", "bob@example.com", 300),
            ],
            vec![
                contact("p1", "Carol", "carol@example.com"),
                contact("p2", "alice (dup)", "alice@example.com"),
                contact("p3", "Dave", "dave@example.com"),
            ],
        )
    }

    fn names(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.display_name.as_str()).collect()
    }

    #[test]
    fn empty_query_returns_sorted_pools() {
        let mut ranker = OptionRanker::default();
        let options = ranker.compute_options(&sample_pools(), "", &HashSet::new());

        assert_eq!(names(&options.recents), vec!["Bob", "Alice"]);
        assert_eq!(names(&options.contacts), vec!["Carol", "Dave"]);
        assert_eq!(options.invite, None);
        assert_eq!(options.status, StatusMessage::None);
    }

    #[test]
    fn contacts_covered_by_recents_are_dropped() {
        let mut ranker = OptionRanker::default();
        let options = ranker.compute_options(&sample_pools(), "alice", &HashSet::new());

        assert_eq!(names(&options.recents), vec!["Alice"]);
        assert!(options.contacts.is_empty());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let mut ranker = OptionRanker::default();
        let pools = sample_pools();
        let padded = ranker.compute_options(&pools, "  car  ", &HashSet::new());
        let bare = ranker.compute_options(&pools, "car", &HashSet::new());
        assert_eq!(padded, bare);
        assert_eq!(names(&bare.contacts), vec!["Carol"]);
    }

    #[test]
    fn contacts_alphabetical_ties_by_id() {
        let pools = CandidatePools::new(
            vec![],
            vec![
                contact("b", "sam", "sam2@example.com"),
                contact("a", "Sam", "sam1@example.com"),
                contact("c", "Ann", "ann@example.com"),
            ],
        );
        let mut ranker = OptionRanker::default();
        let options = ranker.compute_options(&pools, "", &HashSet::new());
        let ids: Vec<&str> = options.contacts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["contact:c", "contact:a", "contact:b"]);
    }

    #[test]
    fn recents_are_capped() {
        let conversations = (0..8)
            .map(|i| direct(&format!("r{i}"), &format!("User {i}"), &format!("u{i}@example.com"), i))
            .collect();
        let pools = CandidatePools::new(conversations, vec![]);
        let mut ranker = OptionRanker::default();
        let options = ranker.compute_options(&pools, "", &HashSet::new());

        assert_eq!(options.recents.len(), 5);
        assert_eq!(options.recents[0].display_name, "User 7");
    }

    #[test]
    fn unknown_email_yields_invite() {
        let mut ranker = OptionRanker::default();
        let options =
            ranker.compute_options(&sample_pools(), "new.person@example.com", &HashSet::new());

        assert!(!options.has_results());
        let invite = options.invite.expect("invite");
        assert_eq!(
            invite.reference.as_ref().map(ContactReference::as_str),
            Some("new.person@example.com")
        );
        assert_eq!(options.status, StatusMessage::None);
    }

    #[test]
    fn known_reference_yields_no_invite() {
        let mut ranker = OptionRanker::default();
        let pools = sample_pools();
        let first = ranker.compute_options(&pools, "Dave@Example.com", &HashSet::new());
        let second = ranker.compute_options(&pools, "Dave@Example.com", &HashSet::new());

        assert_eq!(first.invite, None);
        assert_eq!(names(&first.contacts), vec!["Dave"]);
        assert_eq!(first, second);
    }

    #[test]
    fn known_phone_matches_in_any_format() {
        let mut pools = sample_pools();
        pools.contacts.push(contact("p4", "Erin", "+1 555 123 4567"));
        let mut ranker = OptionRanker::default();

        for query in ["(555) 123-4567", "555.123.4567", "+15551234567"] {
            let options = ranker.compute_options(&pools, query, &HashSet::new());
            assert_eq!(names(&options.contacts), vec!["Erin"], "query {query:?}");
            assert_eq!(options.invite, None);
            assert_eq!(options.status, StatusMessage::None);
        }
    }

    #[test]
    fn known_phone_recent_matches_by_reference() {
        let pools = CandidatePools::new(
            vec![direct("r9", "Frank", "555-987-6543", 10)],
            vec![],
        );
        let mut ranker = OptionRanker::default();
        let options = ranker.compute_options(&pools, "+1 (555) 987 6543", &HashSet::new());
        assert_eq!(names(&options.recents), vec!["Frank"]);
        assert_eq!(options.invite, None);
    }

    #[test]
    fn phone_invite_is_normalized() {
        let mut ranker = OptionRanker::default();
        let options = ranker.compute_options(&sample_pools(), "(555) 123-4567", &HashSet::new());
        let invite = options.invite.expect("invite");
        assert_eq!(
            invite.reference,
            Some(ContactReference::Phone("+15551234567".to_string()))
        );
    }

    #[test]
    fn configured_country_code_applies_to_queries_and_logins() {
        let pools = CandidatePools::new(vec![], vec![contact("p9", "Gail", "20 7946 0958")]);
        let mut ranker = OptionRanker::new(PickerConfig {
            default_country_code: "44".to_string(),
            ..PickerConfig::default()
        });

        let known = ranker.compute_options(&pools, "+44 20 7946 0958", &HashSet::new());
        assert_eq!(names(&known.contacts), vec!["Gail"]);

        let invite = ranker
            .compute_options(&pools, "20 7946 0000", &HashSet::new())
            .invite
            .expect("invite");
        assert_eq!(
            invite.reference,
            Some(ContactReference::Phone("+442079460000".to_string()))
        );
    }

    #[test]
    fn excluded_and_current_user_are_never_offered() {
        let pools = sample_pools().with_current_user("Carol@example.com");
        let excluded: HashSet<String> = ["bob@example.com".to_string()].into_iter().collect();
        let mut ranker = OptionRanker::default();

        let options = ranker.compute_options(&pools, "", &excluded);
        assert_eq!(names(&options.recents), vec!["Alice"]);
        assert_eq!(names(&options.contacts), vec!["Dave"]);

        let self_invite = ranker.compute_options(&pools, "carol@example.com", &excluded);
        assert_eq!(self_invite.invite, None);
        assert_eq!(self_invite.status, StatusMessage::NoResults);
    }

    #[test]
    fn conversation_eligibility() {
        let mut group = direct("g", "Launch crew", "x@example.com", 50);
        group.kind = ConversationKind::Group;
        group.participant = None;
        let mut room = direct("room", "#general", "y@example.com", 60);
        room.kind = ConversationKind::Room;
        room.participant = None;
        let mut archived = direct("old", "Old", "old@example.com", 70);
        archived.archived = true;
        let pools = CandidatePools::new(vec![group, room, archived], vec![]);

        let mut ranker = OptionRanker::default();
        assert!(ranker
            .compute_options(&pools, "", &HashSet::new())
            .recents
            .is_empty());

        let flagged = pools.clone().with_flag(CHAT_ROOMS_FLAG);
        assert_eq!(
            names(&ranker.compute_options(&flagged, "", &HashSet::new()).recents),
            vec!["#general"]
        );

        let mut groups = OptionRanker::new(PickerConfig {
            include_group_conversations: true,
            ..PickerConfig::default()
        });
        assert_eq!(
            names(&groups.compute_options(&pools, "", &HashSet::new()).recents),
            vec!["Launch crew"]
        );
    }

    #[test]
    fn empty_pools_report_no_results() {
        let mut ranker = OptionRanker::default();
        let options = ranker.compute_options(&CandidatePools::default(), "", &HashSet::new());
        assert_eq!(options.total(), 0);
        assert_eq!(options.status, StatusMessage::NoResults);
    }

    #[test]
    fn malformed_queries_get_specific_messages() {
        let mut ranker = OptionRanker::default();
        let pools = sample_pools();
        assert_eq!(
            ranker.compute_options(&pools, "12345", &HashSet::new()).status,
            StatusMessage::InvalidPhone
        );
        assert_eq!(
            ranker.compute_options(&pools, "zed@nowhere", &HashSet::new()).status,
            StatusMessage::InvalidEmail
        );
        assert_eq!(
            ranker.compute_options(&pools, "zed", &HashSet::new()).status,
            StatusMessage::NoResults
        );
    }

    proptest! {
        #[test]
        fn proptest_ids_unique_and_contacts_sorted(
            names in proptest::collection::vec("[a-z]{1,6}", 0..12),
            query in "[a-z]{0,2}",
        ) {
            let contacts = names
                .iter()
                .enumerate()
                .map(|(i, name)| contact(&i.to_string(), name, &format!("{name}{i}@example.com")))
                .collect();
            let conversations = names
                .iter()
                .enumerate()
                .map(|(i, name)| direct(&i.to_string(), name, &format!("{name}{i}@example.com"), i as i64))
                .collect();
            let pools = CandidatePools::new(conversations, contacts);

            let mut ranker = OptionRanker::default();
            let options = ranker.compute_options(&pools, &query, &HashSet::new());

            let mut ids = HashSet::new();
            for candidate in options.recents.iter().chain(options.contacts.iter()) {
                prop_assert!(ids.insert(candidate.id.clone()));
            }
            for pair in options.contacts.windows(2) {
                prop_assert!(pair[0].sort_key() <= pair[1].sort_key());
            }
            for pair in options.recents.windows(2) {
                prop_assert!(pair[0].last_activity >= pair[1].last_activity);
            }
            prop_assert_eq!(options.status.is_empty(), options.total() > 0);
        }
    }
}
