//! Composed control state and the shared `Select` handle
//!
//! One `SelectState` owns everything the spec makes the control the
//! source of truth for: the option pool, the filtered view, the
//! search term, the selection store, the dropdown controller, and the
//! creation flow. Hosts interact through [`Select`], a cheap-to-clone
//! handle wrapping the state behind `Arc<Mutex<..>>`; every operation
//! locks, mutates, and releases before returning, so all transitions
//! stay discrete and non-overlapping.

use std::future::Future;
use std::sync::{Arc, Mutex, Weak};

use crate::create::{CreateOptionFn, CreateOutcome, CreateTicket, CreationFlow};
use crate::dropdown::{DismissGuard, DismissRegistry, DropdownController, ElementId};
use crate::error::{Result, SelectError};
use crate::filter::filter_options;
use crate::option::SelectOption;
use crate::selection::{ChangeCallback, Selection, SelectionMode, SelectionStore, ToggleOutcome};

/// Host-facing configuration for one control instance.
///
/// `multiple` is fixed for the control's lifetime; everything else
/// the host may update later through the [`Select`] handle.
pub struct SelectConfig<V> {
    /// The authoritative option pool
    pub options: Vec<SelectOption<V>>,
    /// Text shown while the selection is empty
    pub placeholder: String,
    /// Multiple-selection mode
    pub multiple: bool,
    /// Show a clear affordance when the selection is non-empty
    pub allow_clear: bool,
    /// Render a loading indicator and freeze search/selection
    pub loading: bool,
    /// Suppress open/close and all selection toggles
    pub disabled: bool,
    /// Invoked with the new selection after every committed mutation
    pub on_change: Option<ChangeCallback<V>>,
    /// Async factory minting an option from the search term; absence
    /// disables the creation affordance entirely
    pub on_create: Option<CreateOptionFn<V>>,
}

impl<V> Default for SelectConfig<V> {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            placeholder: "Select an option".to_string(),
            multiple: false,
            allow_clear: false,
            loading: false,
            disabled: false,
            on_change: None,
            on_create: None,
        }
    }
}

struct SelectState<V> {
    pool: Vec<SelectOption<V>>,
    filtered: Vec<SelectOption<V>>,
    search: String,
    store: SelectionStore<V>,
    dropdown: DropdownController,
    creation: CreationFlow<V>,
    placeholder: String,
    allow_clear: bool,
    loading: bool,
    disabled: bool,
}

impl<V: Clone + PartialEq> SelectState<V> {
    /// Shared commit path for clicks and creation: toggle the store,
    /// then reset the search term (which restores the full filtered
    /// view) and let the dropdown react to the commit.
    fn apply_toggle(&mut self, option: &SelectOption<V>) -> ToggleOutcome {
        let outcome = self.store.toggle(option);
        if outcome == ToggleOutcome::Committed {
            self.search.clear();
            self.filtered = self.pool.clone();
            self.dropdown.select_committed(self.store.mode());
        }
        outcome
    }
}

/// Frees the creation flow's in-flight slot when the owning future is
/// dropped, whether or not it was polled to completion. `settle` is
/// keyed to the ticket, so a guard outliving its own request never
/// clears a newer one.
struct SettleOnDrop<V> {
    state: Weak<Mutex<SelectState<V>>>,
    ticket: CreateTicket,
}

impl<V> Drop for SettleOnDrop<V> {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.lock().unwrap().creation.settle(&self.ticket);
        }
    }
}

/// Shared handle to one mounted selection control.
///
/// Clones share the same state; the outside-interaction subscription
/// is released when the last clone drops.
pub struct Select<V> {
    inner: Arc<Mutex<SelectState<V>>>,
    element: Option<ElementId>,
    _dismiss: Option<Arc<DismissGuard>>,
}

impl<V> Clone for Select<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            element: self.element,
            _dismiss: self._dismiss.clone(),
        }
    }
}

impl<V: Clone + PartialEq + Send + 'static> Select<V> {
    /// Create an unmounted control (no outside-interaction wiring).
    ///
    /// Useful for hosts that dispatch dismissal themselves and for
    /// tests; `mount` is the full-service constructor.
    pub fn new(config: SelectConfig<V>) -> Self {
        let mode = if config.multiple {
            SelectionMode::Multiple
        } else {
            SelectionMode::Single
        };
        let filtered = config.options.clone();
        let state = SelectState {
            pool: config.options,
            filtered,
            search: String::new(),
            store: SelectionStore::new(mode, config.on_change),
            dropdown: DropdownController::new(),
            creation: CreationFlow::new(config.on_create),
            placeholder: config.placeholder,
            allow_clear: config.allow_clear,
            loading: config.loading,
            disabled: config.disabled,
        };
        Self {
            inner: Arc::new(Mutex::new(state)),
            element: None,
            _dismiss: None,
        }
    }

    /// Create a control and subscribe it to outside pointer-downs.
    ///
    /// The subscription closes the dropdown whenever a pointer-down
    /// lands outside the control's element, and is released exactly
    /// once when the last handle clone drops.
    pub fn mount(config: SelectConfig<V>, registry: &DismissRegistry) -> Self {
        let mut select = Self::new(config);
        let element = registry.allocate_element();
        let weak = Arc::downgrade(&select.inner);
        let guard = registry.subscribe(element, move || {
            if let Some(inner) = weak.upgrade() {
                inner.lock().unwrap().dropdown.outside_interaction();
            }
        });
        select.element = Some(element);
        select._dismiss = Some(Arc::new(guard));
        select
    }

    /// The element id this control hit-tests as, when mounted
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    // =========================================================================
    // DROPDOWN
    // =========================================================================

    /// Whether the dropdown is open
    pub fn is_open(&self) -> bool {
        self.inner.lock().unwrap().dropdown.is_open()
    }

    /// Explicit open/close request from the trigger.
    ///
    /// No-op while the host has the control disabled.
    pub fn toggle_dropdown(&self) {
        let mut state = self.inner.lock().unwrap();
        let disabled = state.disabled;
        state.dropdown.toggle(disabled);
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Toggle an option as if the user clicked its dropdown row.
    ///
    /// Disabled options and a loading or disabled control are silent
    /// no-ops. A committed toggle fires `on_change` with the new
    /// selection, then resets the search term; in single mode it also
    /// closes the dropdown. The callback runs after the internal lock
    /// is released, so it may call back into this handle.
    pub fn select_option(&self, option: &SelectOption<V>) -> ToggleOutcome {
        let (outcome, notices) = {
            let mut state = self.inner.lock().unwrap();
            if state.loading || state.disabled {
                return ToggleOutcome::Ignored;
            }
            let outcome = state.apply_toggle(option);
            (outcome, state.store.take_notices())
        };
        for notice in notices {
            notice.dispatch();
        }
        if outcome == ToggleOutcome::Committed {
            tracing::debug!(label = %option.label, "option toggled");
        }
        outcome
    }

    /// Reset the selection to empty (the clear affordance)
    pub fn clear_selection(&self) {
        let notices = {
            let mut state = self.inner.lock().unwrap();
            if state.loading || state.disabled {
                return;
            }
            state.store.clear();
            state.store.take_notices()
        };
        for notice in notices {
            notice.dispatch();
        }
    }

    /// The committed selection
    pub fn selection(&self) -> Selection<V> {
        self.inner.lock().unwrap().store.current().clone()
    }

    /// Replace the selection wholesale (host-driven restore)
    pub fn set_selection(&self, selection: Selection<V>) {
        let notices = {
            let mut state = self.inner.lock().unwrap();
            state.store.set(selection);
            state.store.take_notices()
        };
        for notice in notices {
            notice.dispatch();
        }
    }

    /// The control's selection mode
    pub fn mode(&self) -> SelectionMode {
        self.inner.lock().unwrap().store.mode()
    }

    // =========================================================================
    // SEARCH & POOL
    // =========================================================================

    /// Update the search term and recompute the filtered view.
    ///
    /// Frozen (silent no-op) while the control is loading.
    pub fn set_search(&self, term: impl Into<String>) {
        let mut state = self.inner.lock().unwrap();
        if state.loading {
            return;
        }
        state.search = term.into();
        state.filtered = filter_options(&state.pool, &state.search);
    }

    /// The current search term
    pub fn search_term(&self) -> String {
        self.inner.lock().unwrap().search.clone()
    }

    /// Replace the option pool (host supplied new options).
    ///
    /// Resets the filtered view to the full new pool, discarding any
    /// prior filtering; the search term itself is left alone.
    pub fn set_options(&self, options: Vec<SelectOption<V>>) {
        let mut state = self.inner.lock().unwrap();
        state.filtered = options.clone();
        state.pool = options;
    }

    /// The full option pool, in order
    pub fn options(&self) -> Vec<SelectOption<V>> {
        self.inner.lock().unwrap().pool.clone()
    }

    /// The filtered view: pool entries matching the search term
    pub fn visible_options(&self) -> Vec<SelectOption<V>> {
        self.inner.lock().unwrap().filtered.clone()
    }

    // =========================================================================
    // HOST FLAGS
    // =========================================================================

    pub fn placeholder(&self) -> String {
        self.inner.lock().unwrap().placeholder.clone()
    }

    pub fn allow_clear(&self) -> bool {
        self.inner.lock().unwrap().allow_clear
    }

    pub fn loading(&self) -> bool {
        self.inner.lock().unwrap().loading
    }

    pub fn set_loading(&self, loading: bool) {
        self.inner.lock().unwrap().loading = loading;
    }

    pub fn disabled(&self) -> bool {
        self.inner.lock().unwrap().disabled
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.inner.lock().unwrap().disabled = disabled;
    }

    // =========================================================================
    // CREATION
    // =========================================================================

    /// Whether a creation factory is configured at all
    pub fn create_configured(&self) -> bool {
        self.inner.lock().unwrap().creation.available()
    }

    /// Whether the creation affordance should render: a factory is
    /// configured and the search term is non-empty.
    pub fn can_create(&self) -> bool {
        let state = self.inner.lock().unwrap();
        state.creation.available() && !state.search.is_empty()
    }

    /// Mint a new option from the current search term.
    ///
    /// Invokes the host factory with the term captured at request
    /// time and suspends until it resolves; the rest of the UI keeps
    /// running. On success the option is appended to the pool and the
    /// filtered view, then toggled into the selection exactly as a
    /// click would be. On factory failure nothing is mutated and the
    /// error propagates. A result landing after the term changed or
    /// the control was torn down is discarded, never applied to stale
    /// state; a superseded failure is discarded the same way. At most
    /// one request may be in flight, and dropping the pending future
    /// frees the slot so a later request can begin.
    ///
    /// The returned future is detached from the handle: dropping every
    /// `Select` clone while it is pending turns its result into
    /// [`CreateOutcome::Detached`].
    pub fn create_option(&self) -> impl Future<Output = Result<CreateOutcome<V>>> + Send + 'static {
        let weak = Arc::downgrade(&self.inner);
        async move {
            let (factory, ticket) = {
                let inner = match weak.upgrade() {
                    Some(inner) => inner,
                    None => return Ok(CreateOutcome::Detached),
                };
                let mut state = inner.lock().unwrap();
                if state.disabled || state.loading {
                    return Err(SelectError::CreateUnavailable);
                }
                let term = state.search.clone();
                state.creation.begin(&term)?
            };
            let _settle = SettleOnDrop {
                state: weak.clone(),
                ticket: ticket.clone(),
            };

            // Suspension point: the lock is not held across the await
            let result = factory(ticket.term().to_string()).await;

            let inner = match weak.upgrade() {
                Some(inner) => inner,
                None => {
                    tracing::warn!(term = %ticket.term(), "creation result discarded: control torn down");
                    return Ok(CreateOutcome::Detached);
                }
            };
            let mut state = inner.lock().unwrap();
            state.creation.settle(&ticket);

            // Staleness trumps failure: a result for an abandoned term
            // is discarded whether the factory succeeded or not.
            if state.search != ticket.term() {
                tracing::warn!(
                    requested = %ticket.term(),
                    current = %state.search,
                    "creation result discarded: search term superseded"
                );
                return Ok(CreateOutcome::Superseded);
            }

            let option = result.map_err(SelectError::Factory)?;

            // The pool invariant is value uniqueness; a factory that
            // returns an existing identity selects it instead of
            // duplicating it.
            if !state.pool.iter().any(|o| o.same_value(&option)) {
                state.pool.push(option.clone());
                state.filtered.push(option.clone());
            }
            state.apply_toggle(&option);
            tracing::debug!(label = %option.label, "created option applied");
            let notices = state.store.take_notices();
            drop(state);
            for notice in notices {
                notice.dispatch();
            }
            Ok(CreateOutcome::Applied(option))
        }
    }
}
