//! Session tracking for the rewriting pass.
//!
//! A component session is opened by a start marker and closed by an end
//! marker of the active [`Profile`](crate::patterns::Profile). While any
//! session is open, each line is attributed through the correlation model
//! and buffered under its owner. Closing a session hands its buffer back and
//! makes the model forget the component, both in [`SessionTracker::feed`].
//!
//! Buffers hold the raw bytes of each line; only matching uses decoded text.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace, warn};

use crate::error::{ReconcileError, Result};
use crate::input;
use crate::model::CorrelationModel;

/// Buffered lines of one component session, in log order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentLogs {
    component_id: String,
    open_order: usize,
    lines: Vec<Vec<u8>>,
}

impl ComponentLogs {
    fn new(component_id: String, open_order: usize) -> Self {
        Self {
            component_id,
            open_order,
            lines: Vec::new(),
        }
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    /// Position of this session among all sessions opened so far (0-based).
    pub fn open_order(&self) -> usize {
        self.open_order
    }

    /// Raw lines, without terminators.
    pub fn lines(&self) -> &[Vec<u8>] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<Vec<u8>> {
        self.lines
    }
}

/// Lifecycle of a component id within the rewriting pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unopened,
    Open,
    Closed,
}

/// Per-line outcome, mostly useful for counting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// No session was open.
    Outside,
    /// Appended to the buffer of this component.
    Buffered(String),
    /// Inside a session window but owned by no known component.
    Unattributed,
    /// Owned by a known component that has no open session.
    Orphaned(String),
}

/// Tracks open sessions and routes lines to their buffers.
#[derive(Debug)]
pub struct SessionTracker {
    model: CorrelationModel,
    open: HashMap<String, ComponentLogs>,
    closed: HashSet<String>,
    opened_total: usize,
}

impl SessionTracker {
    /// Takes ownership of a fully built model.
    pub fn new(model: CorrelationModel) -> Self {
        Self {
            model,
            open: HashMap::new(),
            closed: HashSet::new(),
            opened_total: 0,
        }
    }

    pub fn model(&self) -> &CorrelationModel {
        &self.model
    }

    pub fn state(&self, component: &str) -> SessionState {
        if self.open.contains_key(component) {
            SessionState::Open
        } else if self.closed.contains(component) {
            SessionState::Closed
        } else {
            SessionState::Unopened
        }
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Processes one raw line. Returns the flushed session when the line closes one.
    pub fn feed(&mut self, raw: impl AsRef<[u8]>) -> Result<(LineOutcome, Option<ComponentLogs>)> {
        let raw = raw.as_ref();
        let text = input::decode(raw);
        let line: &str = &text;
        let profile = self.model.profile();

        if let Some(component) = profile.started(line) {
            self.open(component)?;
        }

        let closing = profile.finished(line);
        if let Some(component) = closing {
            if !self.open.contains_key(component) {
                return Err(ReconcileError::SessionNotOpen {
                    component: component.to_string(),
                });
            }
        }

        let outcome = if self.open.is_empty() {
            LineOutcome::Outside
        } else {
            self.attribute(line, raw)
        };

        let flushed = match closing {
            Some(component) => Some(self.close(component)?),
            None => None,
        };
        Ok((outcome, flushed))
    }

    /// Sessions still open at end of input, in opening order.
    pub fn finish(self) -> Vec<ComponentLogs> {
        let mut pending: Vec<_> = self.open.into_values().collect();
        pending.sort_by_key(ComponentLogs::open_order);
        pending
    }

    fn open(&mut self, component: &str) -> Result<()> {
        if self.open.contains_key(component) {
            return Err(ReconcileError::SessionAlreadyOpen {
                component: component.to_string(),
            });
        }
        trace!(component, "session opened");
        self.closed.remove(component);
        self.open.insert(
            component.to_string(),
            ComponentLogs::new(component.to_string(), self.opened_total),
        );
        self.opened_total += 1;
        Ok(())
    }

    fn attribute(&mut self, line: &str, raw: &[u8]) -> LineOutcome {
        let Some(component) = self.model.component_id_for_line(line) else {
            debug!("No component found in line: {}", line);
            return LineOutcome::Unattributed;
        };
        match self.open.get_mut(component) {
            Some(logs) => {
                logs.lines.push(raw.to_vec());
                LineOutcome::Buffered(component.to_string())
            }
            None => {
                warn!(component, "No open session for line: {}", line);
                LineOutcome::Orphaned(component.to_string())
            }
        }
    }

    fn close(&mut self, component: &str) -> Result<ComponentLogs> {
        let logs = self
            .open
            .remove(component)
            .ok_or_else(|| ReconcileError::SessionNotOpen {
                component: component.to_string(),
            })?;
        self.closed.insert(component.to_string());
        self.model.forget(component);
        trace!(component, lines = logs.lines.len(), "session closed");
        Ok(logs)
    }
}
