//! Selection store - the single source of truth for what is selected
//!
//! The store owns the committed selection for one control instance.
//! Every committed mutation queues a [`ChangeNotice`] snapshotting the
//! new selection; the owner drains and dispatches the notices only
//! after releasing its own locks, so an `on_change` callback may call
//! back into the control freely. Rendering layers consume the store
//! read-only and resolve the stored values against the current option
//! pool.

use smallvec::SmallVec;
use std::sync::Arc;

use crate::option::SelectOption;

/// Selection mode, fixed for the lifetime of a control instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode {
    /// At most one selected option; a pick replaces the previous one
    Single,
    /// An ordered set of selected options with unique values
    Multiple,
}

/// The committed selection of a control.
///
/// Single mode holds zero or one option; multiple mode holds an
/// ordered sequence whose values are unique.
#[derive(Clone, Debug)]
pub enum Selection<V> {
    Single(Option<SelectOption<V>>),
    Multiple(Vec<SelectOption<V>>),
}

impl<V> Selection<V> {
    /// The empty selection for a mode
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Selection::Single(None),
            SelectionMode::Multiple => Selection::Multiple(Vec::new()),
        }
    }

    /// The mode this selection belongs to
    pub fn mode(&self) -> SelectionMode {
        match self {
            Selection::Single(_) => SelectionMode::Single,
            Selection::Multiple(_) => SelectionMode::Multiple,
        }
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Single(opt) => opt.is_none(),
            Selection::Multiple(opts) => opts.is_empty(),
        }
    }

    /// Number of selected options
    pub fn len(&self) -> usize {
        match self {
            Selection::Single(opt) => usize::from(opt.is_some()),
            Selection::Multiple(opts) => opts.len(),
        }
    }

    /// Selected options in order
    pub fn options(&self) -> Vec<&SelectOption<V>> {
        match self {
            Selection::Single(opt) => opt.iter().collect(),
            Selection::Multiple(opts) => opts.iter().collect(),
        }
    }
}

impl<V: Clone> Selection<V> {
    /// Selected identity values in order
    pub fn values(&self) -> Vec<V> {
        self.options().into_iter().map(|o| o.value.clone()).collect()
    }
}

impl<V: PartialEq> Selection<V> {
    /// Whether a value is currently selected
    pub fn contains_value(&self, value: &V) -> bool {
        self.options().iter().any(|o| &o.value == value)
    }
}

/// Host callback invoked with the new selection after every committed
/// mutation.
pub type ChangeCallback<V> = Arc<dyn Fn(&Selection<V>) + Send + Sync>;

/// A queued `on_change` dispatch.
///
/// Commits record the callback together with a snapshot of the
/// just-committed selection. The owner dispatches drained notices with
/// no locks held; the callback sees the selection exactly as it was at
/// commit time even if later commits queued behind it.
pub struct ChangeNotice<V> {
    callback: ChangeCallback<V>,
    selection: Selection<V>,
}

impl<V> ChangeNotice<V> {
    /// Invoke the callback with the commit-time selection
    pub fn dispatch(self) {
        (self.callback)(&self.selection);
    }
}

/// Result of a toggle request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The selection changed; a change notice has been queued and the
    /// search term must be reset. In single mode the dropdown must
    /// close.
    Committed,
    /// The option was disabled; nothing happened.
    Ignored,
}

/// Owns the current selection and the host change callback.
pub struct SelectionStore<V> {
    mode: SelectionMode,
    selection: Selection<V>,
    on_change: Option<ChangeCallback<V>>,
    notices: SmallVec<[ChangeNotice<V>; 1]>,
}

impl<V: Clone + PartialEq> SelectionStore<V> {
    /// Create an empty store for a mode
    pub fn new(mode: SelectionMode, on_change: Option<ChangeCallback<V>>) -> Self {
        Self {
            mode,
            selection: Selection::empty(mode),
            on_change,
            notices: SmallVec::new(),
        }
    }

    /// The store's mode
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// The present selection, read-only
    pub fn current(&self) -> &Selection<V> {
        &self.selection
    }

    /// Toggle an option as if the user clicked it.
    ///
    /// Multiple mode removes the option when its value is already
    /// selected and appends it at the end otherwise. Single mode
    /// replaces the selection. Disabled options are rejected silently:
    /// no mutation, no notice. A committed toggle queues exactly one
    /// change notice carrying the new selection.
    pub fn toggle(&mut self, option: &SelectOption<V>) -> ToggleOutcome {
        if option.disabled {
            tracing::trace!(label = %option.label, "toggle ignored: option disabled");
            return ToggleOutcome::Ignored;
        }

        match (&mut self.selection, self.mode) {
            (Selection::Multiple(selected), SelectionMode::Multiple) => {
                if let Some(pos) = selected.iter().position(|o| o.same_value(option)) {
                    selected.remove(pos);
                } else {
                    selected.push(option.clone());
                }
            }
            (Selection::Single(slot), SelectionMode::Single) => {
                *slot = Some(option.clone());
            }
            // Selection is constructed from mode and never re-moded
            _ => unreachable!("selection shape diverged from store mode"),
        }

        self.queue_notice();
        ToggleOutcome::Committed
    }

    /// Reset the selection to empty.
    ///
    /// Queues a notice only when there was something to clear.
    pub fn clear(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection = Selection::empty(self.mode);
        self.queue_notice();
    }

    /// Replace the selection wholesale.
    ///
    /// The replacement must match the store's mode; a mismatched shape
    /// is ignored. Multiple-mode input is deduplicated by value,
    /// keeping first occurrences. Queues a notice when the selected
    /// values actually changed.
    pub fn set(&mut self, selection: Selection<V>) {
        if selection.mode() != self.mode {
            tracing::warn!("set ignored: selection shape does not match store mode");
            return;
        }

        let next = match selection {
            Selection::Multiple(opts) => {
                let mut unique: Vec<SelectOption<V>> = Vec::with_capacity(opts.len());
                for opt in opts {
                    if !unique.iter().any(|o| o.same_value(&opt)) {
                        unique.push(opt);
                    }
                }
                Selection::Multiple(unique)
            }
            single => single,
        };

        if next.values() == self.selection.values() {
            return;
        }
        self.selection = next;
        self.queue_notice();
    }

    /// Drain queued change notices, in commit order.
    ///
    /// The owner must dispatch these with no locks held: a callback
    /// that re-enters the control must not find the store's owner
    /// still locked.
    pub fn take_notices(&mut self) -> SmallVec<[ChangeNotice<V>; 1]> {
        std::mem::take(&mut self.notices)
    }

    fn queue_notice(&mut self) {
        if let Some(cb) = &self.on_change {
            self.notices.push(ChangeNotice {
                callback: cb.clone(),
                selection: self.selection.clone(),
            });
        }
    }
}
