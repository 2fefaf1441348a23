//! Headless view model produced by the component layer
//!
//! Plain data describing what a host should draw: the collapsed
//! header and the open dropdown body. Hosts walk these structures and
//! emit whatever markup their toolkit uses; nothing here knows how to
//! paint.

use picklist_core::SelectOption;

/// Visual representation of one option (or one selected tag).
///
/// The default composition is icon + avatar + label text; a custom
/// label renderer may fill these fields however it likes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelView {
    /// Optional leading icon name
    pub icon: Option<String>,
    /// Optional avatar image URL
    pub avatar_url: Option<String>,
    /// The text content
    pub text: String,
}

impl LabelView {
    /// A plain text label
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            icon: None,
            avatar_url: None,
            text: text.into(),
        }
    }
}

/// Default label composition for an option
pub fn default_label<V>(option: &SelectOption<V>) -> LabelView {
    LabelView {
        icon: option.icon.clone(),
        avatar_url: option.avatar_url.clone(),
        text: option.label.clone(),
    }
}

/// One removable tag in the multiple-mode header.
#[derive(Clone, Debug)]
pub struct SelectedTag<V> {
    /// Identity of the selected option, for the remove affordance
    pub value: V,
    /// Rendered label
    pub label: LabelView,
}

/// What the collapsed header displays.
#[derive(Clone, Debug)]
pub enum HeaderContent<V> {
    /// Nothing selected (or the selection no longer resolves against
    /// the pool): show the placeholder
    Placeholder(String),
    /// Single mode with a resolved selection
    Single(LabelView),
    /// Multiple mode: one removable tag per resolved selection entry
    Tags(Vec<SelectedTag<V>>),
}

/// The collapsed display of the control.
#[derive(Clone, Debug)]
pub struct HeaderView<V> {
    pub content: HeaderContent<V>,
    /// Whether the clear affordance should render
    pub show_clear: bool,
    /// Host disabled flag, for styling
    pub disabled: bool,
    /// Whether the dropdown is open (chevron direction)
    pub open: bool,
}

/// One row of the dropdown body.
#[derive(Clone, Debug)]
pub enum DropdownRow<V> {
    /// A selectable option
    Option {
        option: SelectOption<V>,
        label: LabelView,
        /// Whether the option's value is currently selected
        selected: bool,
    },
    /// Nothing matched the search term
    Empty,
    /// The `Create "<term>"` affordance
    Create { term: String },
}

/// The dropdown body content.
#[derive(Clone, Debug)]
pub enum DropdownBody<V> {
    /// Host data is loading; search and selection are frozen
    Loading,
    Rows(Vec<DropdownRow<V>>),
}

/// The open dropdown: search echo plus body.
#[derive(Clone, Debug)]
pub struct DropdownView<V> {
    /// Current search term, echoed into the search input
    pub search_term: String,
    pub body: DropdownBody<V>,
}
