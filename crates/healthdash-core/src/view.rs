//! Per-view state for results fetched from the AI collaborator.
//!
//! A view may fire a new request before the previous one returns. Each
//! request gets a [`Ticket`]; only the most recently issued ticket may
//! change the view, so a slow stale answer never overwrites a newer one.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AiError;

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Serialize)]
pub struct RemoteView<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
    #[serde(skip)]
    generation: u64,
    #[serde(skip)]
    failure_message: &'static str,
}

impl<T> RemoteView<T> {
    /// `failure_message` is what the view shows when a request fails.
    pub fn new(failure_message: &'static str) -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            generation: 0,
            failure_message,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Mark a request as in flight. Clears any previous error.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        Ticket(self.generation)
    }

    /// Apply the outcome of the request behind `ticket`.
    ///
    /// Returns `false` when the ticket is stale and the outcome was
    /// dropped. A failure keeps the previously shown data.
    pub fn resolve(&mut self, ticket: Ticket, outcome: Result<T, AiError>) -> bool {
        if ticket.0 != self.generation {
            debug!(ticket = ticket.0, current = self.generation, "dropping stale response");
            return false;
        }
        self.loading = false;
        match outcome {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(err) => {
                warn!(error = %err, "AI request failed");
                self.error = Some(match err {
                    AiError::QuotaExceeded(message) if !message.trim().is_empty() => message,
                    AiError::MissingApiKey { .. } => err.to_string(),
                    _ => self.failure_message.to_string(),
                });
            }
        }
        true
    }

    /// Drop data and error, invalidating any request still in flight.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.data = None;
        self.loading = false;
        self.error = None;
    }
}
