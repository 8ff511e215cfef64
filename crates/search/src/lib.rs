//! # Picker Search
//!
//! Turns a candidate pool snapshot and a query into ranked buckets:
//! recent conversations, contacts, an optional invite row and a status
//! message.
//!
//! ```text
//! query ──> QueryClassifier ──> QueryType ─────────────┐
//!   │                                                  │
//!   └──> CandidateMatcher (substring tokens) ──┐       │
//!                                              ▼       ▼
//! CandidatePools ──────────────────────> OptionRanker ──> ComputedOptions
//! ```

mod matcher;
mod query_classifier;
mod ranker;
mod status;

pub use matcher::{CandidateMatcher, CompiledQuery};
pub use query_classifier::{QueryClassifier, QueryType};
pub use ranker::{ComputedOptions, OptionRanker};
pub use status::StatusMessage;
