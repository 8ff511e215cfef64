use crate::render::render_text;
use anyhow::{Context, Result};
use picker_candidates::{CandidatePools, PickerConfig};
use picker_session::{
    flat_index_lookup, AssigneeWorkflow, Navigator, PickerSession, RenderInstrumentation,
    SessionController, SessionError, SessionHooks, SessionSnapshot,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prints the committed reference on stdout
pub struct StdoutWorkflow;

impl AssigneeWorkflow for StdoutWorkflow {
    fn emit_assignee_selection(&mut self, resolved_reference: &str) {
        println!("{resolved_reference}");
    }
}

pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn request_close(&mut self) {
        log::debug!("picker close requested");
    }
}

/// Logs the time from session start to first paint
#[derive(Default)]
pub struct LogInstrumentation {
    started: Option<Instant>,
}

impl RenderInstrumentation for LogInstrumentation {
    fn mark_search_render_start(&mut self) {
        self.started = Some(Instant::now());
    }

    fn mark_search_render_end(&mut self) {
        if let Some(started) = self.started.take() {
            log::debug!("search render took {} ms", started.elapsed().as_millis());
        }
    }
}

fn shell_hooks() -> SessionHooks {
    SessionHooks::new(Box::new(StdoutWorkflow), Box::new(LogNavigator))
        .instrumentation(Box::new(LogInstrumentation::default()))
}

/// What a line of shell input asks for
#[derive(Debug, PartialEq, Eq)]
pub enum ShellInput {
    Query(String),
    Pick(usize),
    Quit,
}

impl ShellInput {
    pub fn parse(line: &str) -> Result<Self> {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim() == ":quit" {
            return Ok(Self::Quit);
        }
        if let Some(index) = trimmed.trim().strip_prefix(":pick") {
            let index = index
                .trim()
                .parse::<usize>()
                .with_context(|| format!("invalid row number in {trimmed:?}"))?;
            return Ok(Self::Pick(index));
        }
        Ok(Self::Query(trimmed.to_string()))
    }
}

/// Compute one query without a debounce and return the resulting snapshot
pub fn run_once(pools: CandidatePools, config: PickerConfig, query: &str) -> SessionSnapshot {
    let debounce = config.debounce();
    let mut controller = SessionController::new(Arc::new(pools), config, shell_hooks());
    let now = tokio::time::Instant::now();
    controller.mount();
    if !query.is_empty() {
        controller.on_query_changed(query, now);
        controller.poll(now + debounce);
    }
    controller.on_first_paint();
    controller.snapshot()
}

pub fn print_snapshot(snapshot: &SessionSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
    } else {
        print!("{}", render_text(snapshot));
    }
    Ok(())
}

/// A session that already closed (for instance by a commit) needs no dismiss
fn closed_ok(result: picker_session::Result<()>) -> Result<()> {
    match result {
        Err(SessionError::Closed) => Ok(()),
        other => other.map_err(Into::into),
    }
}

/// Line-oriented shell: each line is a query, `:pick N` commits row `N`,
/// `:quit` (or end of input) dismisses.
pub async fn run_interactive(pools: CandidatePools, config: PickerConfig, json: bool) -> Result<()> {
    let controller = SessionController::new(Arc::new(pools), config, shell_hooks());
    let session = PickerSession::start(controller);
    let mut updates = session.subscribe();

    print_snapshot(&updates.borrow_and_update(), json)?;
    session.first_paint().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_rendered = session.snapshot().recompute_count;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    closed_ok(session.dismiss().await)?;
                    break;
                };
                let sent = match ShellInput::parse(&line) {
                    Ok(ShellInput::Quit) => {
                        closed_ok(session.dismiss().await)?;
                        break;
                    }
                    Ok(ShellInput::Pick(index)) => {
                        let snapshot = session.snapshot();
                        match flat_index_lookup(&snapshot.sections, index) {
                            Some(candidate) if candidate.is_selectable() => {
                                session.activate_row(candidate.clone()).await
                            }
                            Some(candidate) => {
                                log::warn!("row {index} ({}) cannot be assigned", candidate.display_name);
                                Ok(())
                            }
                            None => {
                                log::warn!("no row {index}");
                                Ok(())
                            }
                        }
                    }
                    Ok(ShellInput::Query(text)) => session.query_changed(text).await,
                    Err(err) => {
                        log::warn!("{err:#}");
                        Ok(())
                    }
                };
                if matches!(sent, Err(SessionError::Closed)) {
                    break;
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if snapshot.phase.is_terminal() {
                    break;
                }
                if snapshot.recompute_count != last_rendered {
                    last_rendered = snapshot.recompute_count;
                    print_snapshot(&snapshot, json)?;
                }
            }
        }
    }

    // Wait for the session loop to finish so the commit output is flushed.
    let _ = updates
        .wait_for(|snapshot| snapshot.phase.is_terminal())
        .await;
    Ok(())
}
