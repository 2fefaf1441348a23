//! Select component and its headless view model
//!
//! The component follows a consistent pattern:
//! - Builder function (`select()`)
//! - Interaction passthroughs to the core state machine
//! - View methods (`header_view()`, `dropdown_view()`) producing plain
//!   data for the host to draw

pub mod select;
pub mod view;

pub use select::{
    select, DropdownContext, DropdownRendererFn, LabelRendererFn, SelectBuilder, SelectComponent,
};
pub use view::{
    default_label, DropdownBody, DropdownRow, DropdownView, HeaderContent, HeaderView, LabelView,
    SelectedTag,
};
