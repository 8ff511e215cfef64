use crate::debounce::Debouncer;
use crate::hooks::SessionHooks;
use crate::sections::{build_sections, Section};
use picker_candidates::{Candidate, CandidatePools, PickerConfig};
use picker_search::{ComputedOptions, OptionRanker, StatusMessage};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::Instant;

const RECENTS_TITLE_KEY: &str = "common.recents";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionPhase {
    /// Constructed, nothing computed yet
    Idle,
    /// Sections reflect the applied query
    Loaded,
    /// A query change is waiting for the debounce window
    Filtering,
    /// A row was committed (terminal)
    Committed { reference: String },
    /// Closed without a selection (terminal)
    Dismissed,
}

impl SessionPhase {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed { .. } | Self::Dismissed)
    }
}

/// Query text and the options last computed for it
#[derive(Debug, Clone, Default)]
struct SearchState {
    /// Raw text as typed, echoed back immediately
    query: String,
    /// Trimmed query the current options were computed from
    applied_query: String,
    options: ComputedOptions,
}

/// Observable state of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub query: String,
    pub applied_query: String,
    pub status: StatusMessage,
    pub status_text: String,
    pub sections: Vec<Section>,
    pub recompute_count: u64,
}

/// Owns the search state of one open picker.
///
/// Events come in through the `on_*` methods; deferred work is reported
/// through [`SessionController::next_deadline`] and performed by
/// [`SessionController::poll`]. The caller supplies the clock.
pub struct SessionController {
    pools: Arc<CandidatePools>,
    excluded: HashSet<String>,
    ranker: OptionRanker,
    debouncer: Debouncer,
    state: SearchState,
    phase: SessionPhase,
    hooks: SessionHooks,
    recompute_count: u64,
    render_pending: bool,
}

impl SessionController {
    pub fn new(pools: Arc<CandidatePools>, config: PickerConfig, hooks: SessionHooks) -> Self {
        let debouncer = Debouncer::new(config.debounce());
        Self {
            pools,
            excluded: HashSet::new(),
            ranker: OptionRanker::new(config),
            debouncer,
            state: SearchState::default(),
            phase: SessionPhase::Idle,
            hooks,
            recompute_count: 0,
            render_pending: false,
        }
    }

    /// Builder: reference tokens never to offer
    #[must_use]
    pub fn with_exclusions(mut self, excluded: HashSet<String>) -> Self {
        self.excluded = excluded;
        self
    }

    /// Initial load: compute options for the empty query.
    pub fn mount(&mut self) {
        if self.phase != SessionPhase::Idle {
            return;
        }
        self.hooks.instrumentation.mark_search_render_start();
        self.render_pending = true;
        self.recompute();
        self.phase = SessionPhase::Loaded;
    }

    /// Store the typed text right away and defer recomputation
    pub fn on_query_changed(&mut self, text: impl Into<String>, now: Instant) {
        if self.ignore_when_closed("query change") {
            return;
        }
        self.mount();

        self.state.query = text.into();
        self.debouncer.record(now);
        self.phase = SessionPhase::Filtering;
    }

    /// Deadline of the pending recomputation, if any
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.phase.is_terminal() {
            return None;
        }
        self.debouncer.next_deadline()
    }

    /// Run the pending recomputation if its deadline has passed.
    ///
    /// Returns whether options were recomputed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.phase.is_terminal() || !self.debouncer.take_due(now) {
            return false;
        }
        self.recompute();
        self.phase = SessionPhase::Loaded;
        true
    }

    /// Swap in a fresh snapshot from the candidate repository and recompute
    /// with the latest query.
    pub fn on_pools_changed(&mut self, pools: Arc<CandidatePools>) {
        if self.ignore_when_closed("pools change") {
            return;
        }
        self.pools = pools;
        if self.phase == SessionPhase::Idle {
            self.mount();
            return;
        }
        self.debouncer.cancel();
        self.recompute();
        self.phase = SessionPhase::Loaded;
    }

    /// Commit `candidate` if it carries a resolvable reference.
    ///
    /// Returns whether the selection was committed; rows without a reference
    /// are inert.
    pub fn on_row_activated(&mut self, candidate: &Candidate) -> bool {
        if self.ignore_when_closed("row activation") {
            return false;
        }
        let Some(reference) = candidate.reference.as_ref() else {
            log::debug!("ignoring activation of inert row {}", candidate.id);
            return false;
        };

        let reference = reference.as_str().to_string();
        self.debouncer.cancel();
        self.state.query.clear();
        self.hooks.workflow.emit_assignee_selection(&reference);
        self.hooks.navigator.request_close();
        log::info!("committed assignee {reference}");
        self.phase = SessionPhase::Committed { reference };
        true
    }

    pub fn on_dismiss(&mut self) {
        if self.ignore_when_closed("dismiss") {
            return;
        }
        self.debouncer.cancel();
        self.hooks.navigator.request_close();
        log::info!("picker dismissed without a selection");
        self.phase = SessionPhase::Dismissed;
    }

    /// The shell has laid out the computed sections for the first time
    pub fn on_first_paint(&mut self) {
        self.end_render_mark();
    }

    /// Cancel pending work and close any open instrumentation interval
    pub fn teardown(&mut self) {
        self.debouncer.cancel();
        self.end_render_mark();
    }

    #[must_use]
    pub fn sections(&self) -> Vec<Section> {
        let title = self.hooks.translator.translate(RECENTS_TITLE_KEY);
        build_sections(
            &self.state.options.recents,
            &self.state.options.contacts,
            self.state.options.invite.as_ref(),
            &title,
        )
    }

    /// Localized status message; empty when there is something to pick
    #[must_use]
    pub fn status_text(&self) -> String {
        self.state
            .options
            .status
            .translation_key()
            .map(|key| self.hooks.translator.translate(key))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.state.query
    }

    #[must_use]
    pub fn applied_query(&self) -> &str {
        &self.state.applied_query
    }

    #[must_use]
    pub const fn options(&self) -> &ComputedOptions {
        &self.state.options
    }

    #[must_use]
    pub const fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    #[must_use]
    pub const fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase.clone(),
            query: self.state.query.clone(),
            applied_query: self.state.applied_query.clone(),
            status: self.state.options.status,
            status_text: self.status_text(),
            sections: self.sections(),
            recompute_count: self.recompute_count,
        }
    }

    fn recompute(&mut self) {
        let applied = self.state.query.trim().to_string();
        self.state.options = self
            .ranker
            .compute_options(&self.pools, &applied, &self.excluded);
        self.state.applied_query = applied;
        self.recompute_count += 1;
    }

    fn end_render_mark(&mut self) {
        if std::mem::take(&mut self.render_pending) {
            self.hooks.instrumentation.mark_search_render_end();
        }
    }

    fn ignore_when_closed(&self, event: &str) -> bool {
        if self.phase.is_terminal() {
            log::debug!("ignoring {event} after session closed");
            return true;
        }
        false
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.teardown();
    }
}
