//! # Picker Candidates
//!
//! The data the assignee picker works on: candidate rows, the normalized
//! contact references they commit with, and the read-only pool snapshot the
//! candidate repository hands in.
//!
//! ```text
//! CandidatePools (conversations, contacts, feature flags, current user)
//!     │
//!     ├──> Conversation::to_candidate ─┐
//!     │                                ├──> Candidate { display text, reference }
//!     └──> Contact::to_candidate ──────┘
//! ```

mod config;
mod error;
mod pools;
mod reference;
mod types;

pub use config::PickerConfig;
pub use error::{CandidateError, Result};
pub use pools::{CandidatePools, Contact, Conversation, ConversationKind, CHAT_ROOMS_FLAG};
pub use reference::{looks_like_email, looks_like_phone, ContactReference};
pub use types::{Candidate, CandidateId, CandidateKind};
