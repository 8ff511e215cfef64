use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32String};
use picker_candidates::Candidate;

/// Case-insensitive token matcher for candidate rows using nucleo-matcher.
///
/// Every whitespace-separated query token has to occur as a substring of the
/// candidate's search text (name, secondary text and reference).
pub struct CandidateMatcher {
    matcher: Matcher,
}

/// A compiled query, reusable across all candidates of one computation
pub struct CompiledQuery {
    pattern: Option<Pattern>,
}

impl CompiledQuery {
    /// Whether the query matches everything
    #[must_use]
    pub const fn is_match_all(&self) -> bool {
        self.pattern.is_none()
    }
}

impl CandidateMatcher {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
        }
    }

    /// Compile a query; blank queries match every candidate
    #[must_use]
    pub fn compile(query: &str) -> CompiledQuery {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return CompiledQuery { pattern: None };
        }

        CompiledQuery {
            pattern: Some(Pattern::new(
                trimmed,
                CaseMatching::Ignore,
                Normalization::Smart,
                AtomKind::Substring,
            )),
        }
    }

    pub fn is_match(&mut self, query: &CompiledQuery, candidate: &Candidate) -> bool {
        let Some(pattern) = query.pattern.as_ref() else {
            return true;
        };

        let haystack = Utf32String::from(candidate.search_text().as_str());
        pattern.score(haystack.slice(..), &mut self.matcher).is_some()
    }
}

impl Default for CandidateMatcher {
    fn default() -> Self {
        Self::new()
    }
}
