//! Picklist Core
//!
//! Headless primitives for an interactive selection control
//! (combobox/dropdown):
//!
//! - **Option Model**: value/label/metadata shape every other part
//!   operates on, identity by value only
//! - **Filter Engine**: pure case-insensitive label filtering of the
//!   option pool
//! - **Selection Store**: single source of truth for single/multiple
//!   selection with an exactly-once change callback
//! - **Dropdown Controller**: open/closed state machine with scoped
//!   outside-interaction dismissal
//! - **Creation Flow**: asynchronous, all-or-nothing minting of new
//!   options from free-text input
//!
//! The crate owns truth about what is selected and what is visible;
//! rendering is left to thin consumers of its outputs.
//!
//! # Example
//!
//! ```rust
//! use picklist_core::{Select, SelectConfig, SelectOption};
//!
//! let select = Select::new(SelectConfig {
//!     options: vec![
//!         SelectOption::new("apple", "Apple"),
//!         SelectOption::new("banana", "Banana"),
//!     ],
//!     multiple: true,
//!     ..Default::default()
//! });
//!
//! select.toggle_dropdown();
//! select.set_search("app");
//! let visible = select.visible_options();
//! assert_eq!(visible.len(), 1);
//!
//! select.select_option(&visible[0]);
//! assert_eq!(select.selection().values(), vec!["apple"]);
//! assert_eq!(select.search_term(), "");
//! ```

pub mod create;
pub mod dropdown;
pub mod error;
pub mod filter;
pub mod option;
pub mod selection;
pub mod state;

pub use create::{BoxedCreateFuture, CreateOptionFn, CreateOutcome, CreateTicket, CreationFlow};
pub use dropdown::{
    DismissGuard, DismissKey, DismissRegistry, DropdownController, DropdownState, ElementId,
};
pub use error::{Result, SelectError};
pub use filter::filter_options;
pub use option::SelectOption;
pub use selection::{
    ChangeCallback, ChangeNotice, Selection, SelectionMode, SelectionStore, ToggleOutcome,
};
pub use state::{Select, SelectConfig};
