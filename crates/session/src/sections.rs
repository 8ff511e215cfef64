use picker_candidates::Candidate;
use serde::{Deserialize, Serialize};

/// A titled or untitled group of rows with its position in the flattened list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub candidates: Vec<Candidate>,
    pub should_show: bool,
    /// Number of rows in all sections before this one
    pub index_offset: usize,
}

/// Arrange ranked buckets into display sections.
///
/// Order is recents (titled), contacts, invite. Empty buckets are left out.
/// Each offset is the running total of rows in the sections already added.
#[must_use]
pub fn build_sections(
    recents: &[Candidate],
    contacts: &[Candidate],
    invite: Option<&Candidate>,
    recents_title: &str,
) -> Vec<Section> {
    let invite = invite.map(std::slice::from_ref).unwrap_or_default();
    let buckets = [
        (Some(recents_title), recents),
        (None, contacts),
        (None, invite),
    ];

    let mut sections = Vec::with_capacity(buckets.len());
    let mut index_offset = 0;

    for (title, candidates) in buckets {
        if candidates.is_empty() {
            continue;
        }
        sections.push(Section {
            title: title.map(str::to_string),
            candidates: candidates.to_vec(),
            should_show: true,
            index_offset,
        });
        index_offset += candidates.len();
    }

    sections
}

/// Resolve a flattened row index to its candidate
#[must_use]
pub fn flat_index_lookup(sections: &[Section], index: usize) -> Option<&Candidate> {
    sections
        .iter()
        .rev()
        .find(|section| section.index_offset <= index)
        .and_then(|section| section.candidates.get(index - section.index_offset))
}

/// Total rows across sections
#[must_use]
pub fn total_rows(sections: &[Section]) -> usize {
    sections.iter().map(|section| section.candidates.len()).sum()
}
