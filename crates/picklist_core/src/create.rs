//! Option creation flow - minting new options from free-text input
//!
//! The host supplies an asynchronous factory; the control invokes it
//! with the current search term, suspends without blocking the rest
//! of the UI, and folds a successful result into both the option pool
//! and the selection as if the user had clicked the new option.
//!
//! The flow is all-or-nothing: a failed factory call leaves pool and
//! selection untouched. Stale results are guarded with a ticket
//! captured at request time; a result whose ticket or term has been
//! superseded is discarded instead of applied.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::{Result, SelectError};
use crate::option::SelectOption;

/// Future returned by the host's option factory.
pub type BoxedCreateFuture<V> =
    Pin<Box<dyn Future<Output = anyhow::Result<SelectOption<V>>> + Send>>;

/// Host-supplied asynchronous factory minting an option from a search
/// term. Its absence disables the creation affordance entirely.
pub type CreateOptionFn<V> = Arc<dyn Fn(String) -> BoxedCreateFuture<V> + Send + Sync>;

/// How a creation request concluded on the success path.
#[derive(Clone, Debug, PartialEq)]
pub enum CreateOutcome<V> {
    /// The option was appended to the pool and toggled into the
    /// selection.
    Applied(SelectOption<V>),
    /// The search term changed while the factory was pending; the
    /// result was discarded without touching pool or selection.
    Superseded,
    /// The control was torn down while the factory was pending; the
    /// result was discarded.
    Detached,
}

/// Ticket identifying one in-flight creation request.
///
/// Captures the search term at request time so the result can be
/// validated against the term that is current when it lands.
#[derive(Clone, Debug)]
pub struct CreateTicket {
    id: u64,
    term: String,
}

impl CreateTicket {
    /// The term the factory was invoked with
    pub fn term(&self) -> &str {
        &self.term
    }
}

/// Bookkeeping for the creation flow of one control instance.
pub struct CreationFlow<V> {
    factory: Option<CreateOptionFn<V>>,
    pending: Option<u64>,
    next_id: u64,
}

impl<V> CreationFlow<V> {
    pub fn new(factory: Option<CreateOptionFn<V>>) -> Self {
        Self {
            factory,
            pending: None,
            next_id: 0,
        }
    }

    /// Whether a factory is configured at all
    pub fn available(&self) -> bool {
        self.factory.is_some()
    }

    /// Whether a request is currently in flight
    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a creation request for `term`.
    ///
    /// Rejects when no factory is configured, the term is empty, or a
    /// request is already pending (requests are serialized, never
    /// interleaved).
    pub fn begin(&mut self, term: &str) -> Result<(CreateOptionFn<V>, CreateTicket)> {
        let factory = self
            .factory
            .as_ref()
            .ok_or(SelectError::CreateUnavailable)?
            .clone();
        if term.is_empty() {
            return Err(SelectError::EmptyTerm);
        }
        if self.pending.is_some() {
            return Err(SelectError::CreateInFlight);
        }

        self.next_id += 1;
        let id = self.next_id;
        self.pending = Some(id);
        Ok((
            factory,
            CreateTicket {
                id,
                term: term.to_string(),
            },
        ))
    }

    /// Whether a ticket still refers to the pending request
    pub fn is_current(&self, ticket: &CreateTicket) -> bool {
        self.pending == Some(ticket.id)
    }

    /// Conclude the request for a ticket, clearing the in-flight slot
    /// so a fresh user action can retry.
    pub fn settle(&mut self, ticket: &CreateTicket) {
        if self.pending == Some(ticket.id) {
            self.pending = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> CreateOptionFn<String> {
        Arc::new(|term: String| {
            Box::pin(async move { Ok(SelectOption::new(term.clone(), term)) })
        })
    }

    #[test]
    fn test_begin_requires_factory_and_term() {
        let mut flow: CreationFlow<String> = CreationFlow::new(None);
        assert!(matches!(
            flow.begin("x"),
            Err(SelectError::CreateUnavailable)
        ));

        let mut flow = CreationFlow::new(Some(factory()));
        assert!(matches!(flow.begin(""), Err(SelectError::EmptyTerm)));
    }

    #[test]
    fn test_requests_are_serialized() {
        let mut flow = CreationFlow::new(Some(factory()));
        let (_f, ticket) = flow.begin("x").unwrap();
        assert!(flow.in_flight());
        assert!(matches!(flow.begin("y"), Err(SelectError::CreateInFlight)));

        flow.settle(&ticket);
        assert!(!flow.in_flight());
        assert!(flow.begin("y").is_ok());
    }

    #[test]
    fn test_ticket_currency() {
        let mut flow = CreationFlow::new(Some(factory()));
        let (_f, first) = flow.begin("x").unwrap();
        assert!(flow.is_current(&first));

        flow.settle(&first);
        assert!(!flow.is_current(&first));

        let (_f, second) = flow.begin("y").unwrap();
        assert!(!flow.is_current(&first));
        assert!(flow.is_current(&second));
        assert_eq!(second.term(), "y");
    }
}
