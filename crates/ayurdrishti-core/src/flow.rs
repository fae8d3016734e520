//! Request lifecycle shared by both flows.
//!
//! A flow hands out a [`Ticket`] when it starts a request and only accepts
//! the outcome back with that same ticket. Tickets carry the mount
//! generation of the flow instance that issued them, so a result that
//! arrives after the flow was torn down is recognised and dropped.

use thiserror::Error;
use tracing::debug;

use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing to submit yet (identify: no image chosen).
    Idle,
    /// Form complete, nothing in flight.
    Ready,
    Submitting,
    Resolved,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub mount: u64,
    pub seq: u64,
}

/// A request the caller must now send, plus the ticket to settle it with.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission<R> {
    pub ticket: Ticket,
    pub request: R,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Select an image")]
    MissingImage,
    #[error("a request is already in flight")]
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    /// The ticket belongs to an older mount or an already settled request.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Resolved,
    Failed,
}

/// Phase bookkeeping plus the last good result and last error.
#[derive(Debug, Clone)]
pub(crate) struct Lifecycle<T> {
    mount: u64,
    seq: u64,
    in_flight: Option<u64>,
    outcome: Option<Outcome>,
    result: Option<T>,
    error: Option<String>,
}

impl<T> Lifecycle<T> {
    pub(crate) fn new(mount: u64) -> Self {
        Self {
            mount,
            seq: 0,
            in_flight: None,
            outcome: None,
            result: None,
            error: None,
        }
    }

    pub(crate) fn mount(&self) -> u64 {
        self.mount
    }

    pub(crate) fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Phase given whether the form is complete.
    pub(crate) fn phase(&self, form_ready: bool) -> Phase {
        if self.in_flight.is_some() {
            return Phase::Submitting;
        }
        match self.outcome {
            Some(Outcome::Resolved) => Phase::Resolved,
            Some(Outcome::Failed) => Phase::Failed,
            None if form_ready => Phase::Ready,
            None => Phase::Idle,
        }
    }

    /// Forget the last outcome so the phase falls back to idle/ready.
    /// The displayed result is kept.
    pub(crate) fn rearm(&mut self) {
        if self.in_flight.is_none() {
            self.outcome = None;
        }
    }

    pub(crate) fn begin(&mut self) -> Result<Ticket, SubmitError> {
        if self.in_flight.is_some() {
            return Err(SubmitError::InFlight);
        }
        self.seq += 1;
        self.in_flight = Some(self.seq);
        self.error = None;
        Ok(Ticket {
            mount: self.mount,
            seq: self.seq,
        })
    }

    pub(crate) fn settle(&mut self, ticket: Ticket, outcome: Result<T, ApiError>) -> Settled {
        if ticket.mount != self.mount || self.in_flight != Some(ticket.seq) {
            debug!(
                ticket_mount = ticket.mount,
                ticket_seq = ticket.seq,
                mount = self.mount,
                "discarding result for unmounted flow"
            );
            return Settled::Discarded;
        }

        self.in_flight = None;
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.outcome = Some(Outcome::Resolved);
                self.error = None;
            }
            Err(e) => {
                // A failure never touches the displayed result.
                self.outcome = Some(Outcome::Failed);
                self.error = Some(format!("Error: {}", e));
            }
        }
        Settled::Applied
    }

    pub(crate) fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub(crate) fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
