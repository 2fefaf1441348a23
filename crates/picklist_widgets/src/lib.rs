//! # Picklist Widgets
//!
//! Component layer on top of the `picklist_core` primitives.
//!
//! ## Philosophy
//!
//! `picklist_core` owns the truth: the option pool, the filtered view,
//! the committed selection, the dropdown state, and the creation flow.
//! This crate turns that truth into a headless view model a host
//! toolkit can draw, and offers a fluent builder for wiring the whole
//! control together.
//!
//! - **Primitives**: `picklist_core` provides the selection store,
//!   filter engine, dropdown controller, and creation flow
//! - **View model**: plain data (`HeaderView`, `DropdownView`) with no
//!   rendering knowledge
//! - **Strategies**: custom label and dropdown renderers slot in at
//!   construction time without touching the core logic
//!
//! ## Example
//!
//! ```rust
//! use picklist_widgets::prelude::*;
//!
//! let fruit = select()
//!     .placeholder("Pick a fruit")
//!     .option("apple", "Apple")
//!     .option("banana", "Banana")
//!     .allow_clear(true)
//!     .build();
//!
//! fruit.toggle_dropdown();
//! fruit.set_search("app");
//!
//! let view = fruit.dropdown_view().unwrap();
//! match view.body {
//!     DropdownBody::Rows(rows) => assert_eq!(rows.len(), 1),
//!     DropdownBody::Loading => unreachable!(),
//! }
//! ```

pub mod components;

pub use components::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::components::select::{
        select, DropdownContext, SelectBuilder, SelectComponent,
    };
    pub use crate::components::view::{
        default_label, DropdownBody, DropdownRow, DropdownView, HeaderContent, HeaderView,
        LabelView, SelectedTag,
    };
    // Core types hosts interact with directly
    pub use picklist_core::{
        CreateOutcome, DismissRegistry, Select, SelectOption, Selection, SelectionMode,
        ToggleOutcome,
    };
}
