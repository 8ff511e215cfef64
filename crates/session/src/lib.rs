//! # Picker Session
//!
//! One open assignee picker: arranges ranked options into display sections,
//! debounces query changes, and runs the commit/dismiss protocol against
//! injected collaborators.
//!
//! ```text
//! shell ──on_query_changed──> SessionController ──(debounce)──> OptionRanker
//!   ▲                              │
//!   └──── SessionSnapshot <────────┤ build_sections
//!                                  └──> AssigneeWorkflow / Navigator
//! ```
//!
//! [`SessionController`] is a synchronous state machine that takes the clock
//! as an argument; [`PickerSession`] drives it from a tokio task.

mod controller;
mod debounce;
mod error;
pub mod hooks;
mod runtime;
mod sections;

pub use controller::{SessionController, SessionPhase, SessionSnapshot};
pub use debounce::Debouncer;
pub use error::{Result, SessionError};
pub use hooks::{
    AssigneeWorkflow, EnglishTranslator, Navigator, NoopInstrumentation, RenderInstrumentation,
    SessionHooks, Translator,
};
pub use runtime::PickerSession;
pub use sections::{build_sections, flat_index_lookup, total_rows, Section};
