//! Dropdown controller and outside-interaction dismissal
//!
//! The controller is a two-state machine (`Closed`/`Open`) driven by
//! explicit events: a toggle request, an outside pointer-down, or a
//! committed single-select pick. It never opens on its own and never
//! transitions while the host has the control disabled.
//!
//! Outside-interaction detection is a scoped resource rather than a
//! process-wide listener: mounting a control subscribes it to a
//! [`DismissRegistry`] and the returned [`DismissGuard`] unsubscribes
//! exactly once when dropped, so torn-down controls can never fire.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::selection::SelectionMode;

/// Dropdown visibility state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DropdownState {
    #[default]
    Closed,
    Open,
}

/// Owns open/closed state for one control instance.
#[derive(Debug, Default)]
pub struct DropdownController {
    state: DropdownState,
}

impl DropdownController {
    /// Create a controller in the initial `Closed` state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> DropdownState {
        self.state
    }

    /// Whether the dropdown is open
    pub fn is_open(&self) -> bool {
        self.state == DropdownState::Open
    }

    /// An explicit toggle request from the host (trigger click).
    ///
    /// No-op in both directions while the control is disabled.
    pub fn toggle(&mut self, disabled: bool) -> DropdownState {
        if !disabled {
            self.state = match self.state {
                DropdownState::Closed => DropdownState::Open,
                DropdownState::Open => DropdownState::Closed,
            };
            tracing::trace!(state = ?self.state, "dropdown toggled");
        }
        self.state
    }

    /// A pointer-down landed outside the control's subtree
    pub fn outside_interaction(&mut self) {
        if self.is_open() {
            tracing::trace!("dropdown dismissed by outside interaction");
        }
        self.state = DropdownState::Closed;
    }

    /// A toggle was committed in the selection store.
    ///
    /// Single mode closes the dropdown; multiple mode leaves it open
    /// so the user can keep picking.
    pub fn select_committed(&mut self, mode: SelectionMode) {
        if mode == SelectionMode::Single {
            self.state = DropdownState::Closed;
        }
    }
}

new_key_type! {
    /// Handle for one registered dismiss listener
    pub struct DismissKey;
}

/// Identity of a mounted control within the host's hit-testing world.
pub type ElementId = u64;

type DismissFn = Arc<dyn Fn() + Send + Sync>;

struct DismissListener {
    element: ElementId,
    on_outside: DismissFn,
}

type SharedListeners = Arc<Mutex<SlotMap<DismissKey, DismissListener>>>;

/// Registry of mounted controls interested in outside pointer-downs.
///
/// The host owns one registry per event-dispatch scope (typically one
/// per window) and forwards every pointer-down with the chain of
/// element ids under the pointer. Listeners whose element is not on
/// that chain are notified.
#[derive(Default)]
pub struct DismissRegistry {
    listeners: SharedListeners,
    next_element: AtomicU64,
}

impl DismissRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh element id for a control about to mount
    pub fn allocate_element(&self) -> ElementId {
        self.next_element.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Subscribe a control to outside pointer-downs.
    ///
    /// `on_outside` fires when a pointer-down lands outside `element`.
    /// The subscription lives exactly as long as the returned guard.
    pub fn subscribe<F>(&self, element: ElementId, on_outside: F) -> DismissGuard
    where
        F: Fn() + Send + Sync + 'static,
    {
        let key = self.listeners.lock().unwrap().insert(DismissListener {
            element,
            on_outside: Arc::new(on_outside),
        });
        DismissGuard {
            listeners: Arc::downgrade(&self.listeners),
            key,
        }
    }

    /// Dispatch a pointer-down event.
    ///
    /// `hit_path` is the chain of element ids from the hit target up
    /// to the root. Every listener whose element is absent from the
    /// path is notified, outside the registry lock so listeners may
    /// subscribe or unsubscribe re-entrantly.
    pub fn pointer_down(&self, hit_path: &[ElementId]) {
        let outside: SmallVec<[DismissFn; 4]> = {
            let listeners = self.listeners.lock().unwrap();
            listeners
                .values()
                .filter(|l| !hit_path.contains(&l.element))
                .map(|l| l.on_outside.clone())
                .collect()
        };
        for listener in outside {
            listener();
        }
    }

    /// Number of live subscriptions (for leak assertions in tests)
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }
}

/// RAII subscription to a [`DismissRegistry`].
///
/// Dropping the guard deregisters the listener exactly once; if the
/// registry itself is already gone the drop is a no-op.
pub struct DismissGuard {
    listeners: Weak<Mutex<SlotMap<DismissKey, DismissListener>>>,
    key: DismissKey,
}

impl Drop for DismissGuard {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().unwrap().remove(self.key);
        }
    }
}
