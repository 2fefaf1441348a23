//! Select component - searchable single/multiple selection control
//!
//! Builds on the `picklist_core` state machine and turns its outputs
//! into the headless view model. Rendering of both the collapsed
//! header and the dropdown body can be overridden by host-supplied
//! strategy functions chosen at construction time; the core logic is
//! identical whichever strategy is active.
//!
//! # Example
//!
//! ```ignore
//! use picklist_widgets::prelude::*;
//!
//! let countries = select()
//!     .placeholder("Search countries...")
//!     .option("us", "United States")
//!     .option("uk", "United Kingdom")
//!     .multiple(true)
//!     .allow_clear(true)
//!     .on_change(|selection| println!("selected: {:?}", selection.values()))
//!     .build();
//!
//! countries.toggle_dropdown();
//! countries.set_search("uni");
//! let view = countries.dropdown_view().unwrap();
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use picklist_core::{
    CreateOutcome, DismissRegistry, Select, SelectConfig, SelectOption, Selection, SelectionMode,
    ToggleOutcome,
};

use super::view::{
    default_label, DropdownBody, DropdownRow, DropdownView, HeaderContent, HeaderView, LabelView,
    SelectedTag,
};

/// Strategy producing the visual representation of one option.
pub type LabelRendererFn<V> = Arc<dyn Fn(&SelectOption<V>) -> LabelView + Send + Sync>;

/// Strategy producing the dropdown body rows from live control state.
pub type DropdownRendererFn<V> =
    Arc<dyn Fn(&DropdownContext<V>) -> Vec<DropdownRow<V>> + Send + Sync>;

type BoxedCreateOutcome<V> =
    Pin<Box<dyn Future<Output = picklist_core::Result<CreateOutcome<V>>> + Send>>;

type CreateInvokeFn<V> = Arc<dyn Fn() -> BoxedCreateOutcome<V> + Send + Sync>;

/// Everything a dropdown renderer needs: the filtered view, current
/// state, and live callbacks bound to the same selection store and
/// filter engine the built-in renderer uses. Invoking the callbacks
/// has identical effects to the built-in path.
#[derive(Clone)]
pub struct DropdownContext<V> {
    /// The filtered view, in pool order
    pub options: Vec<SelectOption<V>>,
    /// Current search term
    pub search_term: String,
    /// The committed selection
    pub selection: Selection<V>,
    /// Whether the control is in multiple mode
    pub multiple: bool,
    /// Whether the creation affordance should render
    pub can_create: bool,
    on_option_select: Arc<dyn Fn(&SelectOption<V>) + Send + Sync>,
    on_search_change: Arc<dyn Fn(&str) + Send + Sync>,
    on_create_option: Option<CreateInvokeFn<V>>,
}

impl<V> DropdownContext<V> {
    /// Toggle an option exactly as the built-in row click would
    pub fn select_option(&self, option: &SelectOption<V>) {
        (self.on_option_select)(option);
    }

    /// Update the search term exactly as the built-in input would
    pub fn set_search(&self, term: &str) {
        (self.on_search_change)(term);
    }

    /// Start the creation flow; `None` when no factory is configured
    pub fn create_option(&self) -> Option<BoxedCreateOutcome<V>> {
        self.on_create_option.as_ref().map(|invoke| invoke())
    }
}

/// Fluent builder for [`SelectComponent`].
pub struct SelectBuilder<V> {
    config: SelectConfig<V>,
    custom_label: Option<LabelRendererFn<V>>,
    custom_dropdown: Option<DropdownRendererFn<V>>,
}

/// Create a select component builder
pub fn select<V>() -> SelectBuilder<V> {
    SelectBuilder {
        config: SelectConfig::default(),
        custom_label: None,
        custom_dropdown: None,
    }
}

impl<V: Clone + PartialEq + Send + 'static> SelectBuilder<V> {
    /// Add an option with value and label
    pub fn option(mut self, value: V, label: impl Into<String>) -> Self {
        self.config.options.push(SelectOption::new(value, label));
        self
    }

    /// Add a disabled option
    pub fn option_disabled(mut self, value: V, label: impl Into<String>) -> Self {
        self.config
            .options
            .push(SelectOption::new(value, label).disabled());
        self
    }

    /// Add multiple options
    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption<V>>) -> Self {
        self.config.options.extend(options);
        self
    }

    /// Set the placeholder text shown while the selection is empty
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = placeholder.into();
        self
    }

    /// Select multiple values instead of one (fixed for the
    /// component's lifetime)
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.config.multiple = multiple;
        self
    }

    /// Show a clear affordance when the selection is non-empty
    pub fn allow_clear(mut self, allow: bool) -> Self {
        self.config.allow_clear = allow;
        self
    }

    /// Render a loading indicator and freeze interaction
    pub fn loading(mut self, loading: bool) -> Self {
        self.config.loading = loading;
        self
    }

    /// Suppress open/close and all selection toggles
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.config.disabled = disabled;
        self
    }

    /// Set the change callback, invoked with the new selection after
    /// every committed mutation
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Selection<V>) + Send + Sync + 'static,
    {
        self.config.on_change = Some(Arc::new(callback));
        self
    }

    /// Enable on-the-fly option creation with an async factory.
    ///
    /// The factory receives the search term captured when the user
    /// activated the creation affordance.
    pub fn on_create_option<F, Fut>(mut self, factory: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<SelectOption<V>>> + Send + 'static,
    {
        self.config.on_create = Some(Arc::new(move |term| Box::pin(factory(term))));
        self
    }

    /// Override how one option is rendered (header and rows)
    pub fn custom_label<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&SelectOption<V>) -> LabelView + Send + Sync + 'static,
    {
        self.custom_label = Some(Arc::new(renderer));
        self
    }

    /// Override how the dropdown body is rendered
    pub fn custom_dropdown<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&DropdownContext<V>) -> Vec<DropdownRow<V>> + Send + Sync + 'static,
    {
        self.custom_dropdown = Some(Arc::new(renderer));
        self
    }

    /// Build without outside-interaction wiring
    pub fn build(self) -> SelectComponent<V> {
        SelectComponent {
            select: Select::new(self.config),
            custom_label: self.custom_label,
            custom_dropdown: self.custom_dropdown,
        }
    }

    /// Build and subscribe to outside pointer-downs via the registry
    pub fn mount(self, registry: &DismissRegistry) -> SelectComponent<V> {
        SelectComponent {
            select: Select::mount(self.config, registry),
            custom_label: self.custom_label,
            custom_dropdown: self.custom_dropdown,
        }
    }
}

/// A select control plus its presentation strategies.
///
/// Thin consumer of the core state machine: interaction methods pass
/// straight through, and the view methods assemble the headless view
/// model from the core's outputs.
pub struct SelectComponent<V> {
    select: Select<V>,
    custom_label: Option<LabelRendererFn<V>>,
    custom_dropdown: Option<DropdownRendererFn<V>>,
}

impl<V> Clone for SelectComponent<V> {
    fn clone(&self) -> Self {
        Self {
            select: self.select.clone(),
            custom_label: self.custom_label.clone(),
            custom_dropdown: self.custom_dropdown.clone(),
        }
    }
}

impl<V: Clone + PartialEq + Send + 'static> SelectComponent<V> {
    /// The underlying core handle
    pub fn handle(&self) -> &Select<V> {
        &self.select
    }

    /// Explicit open/close request from the trigger
    pub fn toggle_dropdown(&self) {
        self.select.toggle_dropdown();
    }

    /// Whether the dropdown is open
    pub fn is_open(&self) -> bool {
        self.select.is_open()
    }

    /// Toggle an option as if its dropdown row was clicked
    pub fn select_option(&self, option: &SelectOption<V>) -> ToggleOutcome {
        self.select.select_option(option)
    }

    /// Remove one selected value (the tag's `x` affordance).
    ///
    /// Routes through the same toggle path as a row click, resolving
    /// the option against the current pool first.
    pub fn remove_selected(&self, value: &V) -> ToggleOutcome {
        let target = self
            .select
            .options()
            .into_iter()
            .find(|o| &o.value == value)
            .or_else(|| {
                self.select
                    .selection()
                    .options()
                    .into_iter()
                    .find(|o| &o.value == value)
                    .cloned()
            });
        match target {
            Some(option) => self.select.select_option(&option),
            None => {
                tracing::debug!("tag removal ignored: value not in pool or selection");
                ToggleOutcome::Ignored
            }
        }
    }

    /// Update the search term
    pub fn set_search(&self, term: impl Into<String>) {
        self.select.set_search(term);
    }

    /// Reset the selection (the clear affordance)
    pub fn clear_selection(&self) {
        self.select.clear_selection();
    }

    /// Mint a new option from the current search term (see
    /// [`Select::create_option`])
    pub fn create_option(
        &self,
    ) -> impl Future<Output = picklist_core::Result<CreateOutcome<V>>> + Send + 'static {
        self.select.create_option()
    }

    /// Assemble the collapsed header view.
    ///
    /// Selection entries are resolved against the current pool by
    /// value; a single-mode selection that no longer resolves falls
    /// back to the placeholder, and unresolved multiple-mode entries
    /// are skipped.
    pub fn header_view(&self) -> HeaderView<V> {
        let selection = self.select.selection();
        let pool = self.select.options();
        let placeholder = self.select.placeholder();

        let content = match &selection {
            Selection::Single(Some(picked)) => {
                match pool.iter().find(|o| o.same_value(picked)) {
                    Some(resolved) => HeaderContent::Single(self.render_label(resolved)),
                    None => HeaderContent::Placeholder(placeholder),
                }
            }
            Selection::Single(None) => HeaderContent::Placeholder(placeholder),
            Selection::Multiple(picked) => {
                let tags: Vec<SelectedTag<V>> = picked
                    .iter()
                    .filter_map(|entry| {
                        pool.iter().find(|o| o.same_value(entry)).map(|resolved| {
                            SelectedTag {
                                value: resolved.value.clone(),
                                label: self.render_label(resolved),
                            }
                        })
                    })
                    .collect();
                if tags.is_empty() {
                    HeaderContent::Placeholder(placeholder)
                } else {
                    HeaderContent::Tags(tags)
                }
            }
        };

        HeaderView {
            content,
            show_clear: self.select.allow_clear()
                && !selection.is_empty()
                && !self.select.loading(),
            disabled: self.select.disabled(),
            open: self.select.is_open(),
        }
    }

    /// Assemble the dropdown view, or `None` while closed.
    ///
    /// While the host is loading the body is a loading indicator and
    /// no rows are produced. Otherwise the configured dropdown
    /// renderer (custom or built-in) supplies the rows.
    pub fn dropdown_view(&self) -> Option<DropdownView<V>> {
        if !self.select.is_open() {
            return None;
        }
        let search_term = self.select.search_term();
        if self.select.loading() {
            return Some(DropdownView {
                search_term,
                body: DropdownBody::Loading,
            });
        }
        let rows = match &self.custom_dropdown {
            Some(renderer) => renderer(&self.context()),
            None => self.default_rows(),
        };
        Some(DropdownView {
            search_term,
            body: DropdownBody::Rows(rows),
        })
    }

    fn render_label(&self, option: &SelectOption<V>) -> LabelView {
        match &self.custom_label {
            Some(renderer) => renderer(option),
            None => default_label(option),
        }
    }

    fn default_rows(&self) -> Vec<DropdownRow<V>> {
        let selection = self.select.selection();
        let mut rows: Vec<DropdownRow<V>> = self
            .select
            .visible_options()
            .into_iter()
            .map(|option| {
                let label = self.render_label(&option);
                let selected = selection.contains_value(&option.value);
                DropdownRow::Option {
                    option,
                    label,
                    selected,
                }
            })
            .collect();

        if rows.is_empty() {
            rows.push(DropdownRow::Empty);
        }
        if self.select.can_create() {
            rows.push(DropdownRow::Create {
                term: self.select.search_term(),
            });
        }
        rows
    }

    /// Build the live context handed to custom dropdown renderers
    fn context(&self) -> DropdownContext<V> {
        let on_option_select: Arc<dyn Fn(&SelectOption<V>) + Send + Sync> = {
            let select = self.select.clone();
            Arc::new(move |option: &SelectOption<V>| {
                select.select_option(option);
            })
        };
        let on_search_change: Arc<dyn Fn(&str) + Send + Sync> = {
            let select = self.select.clone();
            Arc::new(move |term: &str| select.set_search(term))
        };
        let on_create_option: Option<CreateInvokeFn<V>> = if self.select.create_configured() {
            let select = self.select.clone();
            Some(Arc::new(move || Box::pin(select.create_option()) as BoxedCreateOutcome<V>))
        } else {
            None
        };

        DropdownContext {
            options: self.select.visible_options(),
            search_term: self.select.search_term(),
            selection: self.select.selection(),
            multiple: self.select.mode() == SelectionMode::Multiple,
            can_create: self.select.can_create(),
            on_option_select,
            on_search_change,
            on_create_option,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn fruit_select() -> SelectBuilder<&'static str> {
        select()
            .option("apple", "Apple")
            .option("banana", "Banana")
            .option_disabled("cherry", "Cherry")
    }

    fn rows_of(view: DropdownView<&'static str>) -> Vec<DropdownRow<&'static str>> {
        match view.body {
            DropdownBody::Rows(rows) => rows,
            DropdownBody::Loading => panic!("expected rows, got loading body"),
        }
    }

    #[test]
    fn test_dropdown_closed_yields_no_view() {
        let component = fruit_select().build();
        assert!(component.dropdown_view().is_none());

        component.toggle_dropdown();
        assert!(component.dropdown_view().is_some());
    }

    #[test]
    fn test_default_rows_follow_filter() {
        let component = fruit_select().build();
        component.toggle_dropdown();
        component.set_search("AP");

        let rows = rows_of(component.dropdown_view().unwrap());
        assert_eq!(rows.len(), 1);
        match &rows[0] {
            DropdownRow::Option { option, label, selected } => {
                assert_eq!(option.value, "apple");
                assert_eq!(label.text, "Apple");
                assert!(!selected);
            }
            other => panic!("expected option row, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_row_when_nothing_matches() {
        let component = fruit_select().build();
        component.toggle_dropdown();
        component.set_search("durian");

        let rows = rows_of(component.dropdown_view().unwrap());
        assert!(matches!(rows.as_slice(), [DropdownRow::Empty]));
    }

    #[test]
    fn test_create_row_requires_factory_and_term() {
        // No factory: never a create row
        let component = fruit_select().build();
        component.toggle_dropdown();
        component.set_search("dur");
        let rows = rows_of(component.dropdown_view().unwrap());
        assert!(!rows.iter().any(|r| matches!(r, DropdownRow::Create { .. })));

        // Factory but empty term: no create row
        let component = fruit_select()
            .on_create_option(|term| async move { Ok(SelectOption::new("new", term)) })
            .build();
        component.toggle_dropdown();
        let rows = rows_of(component.dropdown_view().unwrap());
        assert!(!rows.iter().any(|r| matches!(r, DropdownRow::Create { .. })));

        // Factory and term: create row carries the term
        component.set_search("dur");
        let rows = rows_of(component.dropdown_view().unwrap());
        match rows.last().unwrap() {
            DropdownRow::Create { term } => assert_eq!(term, "dur"),
            other => panic!("expected create row, got {other:?}"),
        }
    }

    #[test]
    fn test_selected_flags_in_multiple_mode() {
        let component = fruit_select().multiple(true).build();
        component.toggle_dropdown();
        let apple = component.handle().options()[0].clone();
        component.select_option(&apple);

        let rows = rows_of(component.dropdown_view().unwrap());
        let flags: Vec<bool> = rows
            .iter()
            .map(|r| match r {
                DropdownRow::Option { selected, .. } => *selected,
                other => panic!("unexpected row {other:?}"),
            })
            .collect();
        assert_eq!(flags, vec![true, false, false]);
    }

    #[test]
    fn test_header_placeholder_then_selection() {
        let component = fruit_select().placeholder("Pick a fruit").build();

        match component.header_view().content {
            HeaderContent::Placeholder(text) => assert_eq!(text, "Pick a fruit"),
            other => panic!("expected placeholder, got {other:?}"),
        }

        let apple = component.handle().options()[0].clone();
        component.select_option(&apple);
        match component.header_view().content {
            HeaderContent::Single(label) => assert_eq!(label.text, "Apple"),
            other => panic!("expected single label, got {other:?}"),
        }
    }

    #[test]
    fn test_header_tags_and_removal() {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let changes_clone = changes.clone();
        let component = fruit_select()
            .multiple(true)
            .on_change(move |sel: &Selection<&'static str>| {
                changes_clone.lock().unwrap().push(sel.values());
            })
            .build();

        let opts = component.handle().options();
        component.select_option(&opts[0]);
        component.select_option(&opts[1]);

        match component.header_view().content {
            HeaderContent::Tags(tags) => {
                let labels: Vec<_> = tags.iter().map(|t| t.label.text.clone()).collect();
                assert_eq!(labels, vec!["Apple", "Banana"]);
            }
            other => panic!("expected tags, got {other:?}"),
        }

        // Tag removal goes through the same toggle path
        assert_eq!(component.remove_selected(&"apple"), ToggleOutcome::Committed);
        assert_eq!(component.handle().selection().values(), vec!["banana"]);
        assert_eq!(
            *changes.lock().unwrap(),
            vec![vec!["apple"], vec!["apple", "banana"], vec!["banana"]]
        );
    }

    #[test]
    fn test_stale_selection_falls_back_to_placeholder() {
        let component = fruit_select().placeholder("Pick a fruit").build();
        let apple = component.handle().options()[0].clone();
        component.select_option(&apple);

        // Host swaps the pool out from under the selection
        component.handle().set_options(vec![SelectOption::new("kiwi", "Kiwi")]);
        match component.header_view().content {
            HeaderContent::Placeholder(text) => assert_eq!(text, "Pick a fruit"),
            other => panic!("expected placeholder fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_clear_affordance_visibility() {
        let component = fruit_select().allow_clear(true).build();
        assert!(!component.header_view().show_clear, "empty selection");

        let apple = component.handle().options()[0].clone();
        component.select_option(&apple);
        assert!(component.header_view().show_clear);

        component.handle().set_loading(true);
        assert!(!component.header_view().show_clear, "hidden while loading");

        component.handle().set_loading(false);
        component.clear_selection();
        assert!(!component.header_view().show_clear);
        assert!(component.handle().selection().is_empty());
    }

    #[test]
    fn test_loading_body() {
        let component = fruit_select().loading(true).build();
        component.toggle_dropdown();
        match component.dropdown_view().unwrap().body {
            DropdownBody::Loading => {}
            other => panic!("expected loading body, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_label_renderer() {
        let component = fruit_select()
            .custom_label(|opt| LabelView::text(opt.label.to_uppercase()))
            .build();
        component.toggle_dropdown();

        let rows = rows_of(component.dropdown_view().unwrap());
        match &rows[0] {
            DropdownRow::Option { label, .. } => assert_eq!(label.text, "APPLE"),
            other => panic!("unexpected row {other:?}"),
        }

        let apple = component.handle().options()[0].clone();
        component.select_option(&apple);
        match component.header_view().content {
            HeaderContent::Single(label) => assert_eq!(label.text, "APPLE"),
            other => panic!("expected single label, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_dropdown_callbacks_match_builtin_path() {
        let stash: Arc<Mutex<Option<DropdownContext<&'static str>>>> =
            Arc::new(Mutex::new(None));
        let stash_clone = stash.clone();

        let component = fruit_select()
            .custom_dropdown(move |ctx| {
                *stash_clone.lock().unwrap() = Some(ctx.clone());
                vec![DropdownRow::Empty]
            })
            .build();
        component.toggle_dropdown();

        // The custom renderer's rows become the body
        let rows = rows_of(component.dropdown_view().unwrap());
        assert!(matches!(rows.as_slice(), [DropdownRow::Empty]));

        let ctx = stash.lock().unwrap().take().unwrap();
        assert_eq!(ctx.options.len(), 3);
        assert!(!ctx.multiple);

        // Searching through the context drives the same filter engine
        ctx.set_search("ban");
        assert_eq!(component.handle().visible_options().len(), 1);

        // Selecting through the context commits, resets the search,
        // and closes the dropdown in single mode
        let banana = component.handle().visible_options()[0].clone();
        ctx.select_option(&banana);
        assert_eq!(component.handle().selection().values(), vec!["banana"]);
        assert_eq!(component.handle().search_term(), "");
        assert!(!component.is_open());
    }

    #[test]
    fn test_custom_dropdown_create_callback() {
        let stash: Arc<Mutex<Option<DropdownContext<String>>>> = Arc::new(Mutex::new(None));
        let stash_clone = stash.clone();

        let component = select::<String>()
            .option("a".to_string(), "Alpha")
            .multiple(true)
            .on_create_option(|term: String| async move {
                Ok(SelectOption::new(term.clone(), term))
            })
            .custom_dropdown(move |ctx| {
                *stash_clone.lock().unwrap() = Some(ctx.clone());
                Vec::new()
            })
            .build();
        component.toggle_dropdown();
        component.set_search("x");

        component.dropdown_view();
        let ctx = stash.lock().unwrap().take().unwrap();
        assert!(ctx.can_create);

        let outcome = pollster::block_on(ctx.create_option().unwrap()).unwrap();
        assert!(matches!(outcome, CreateOutcome::Applied(_)));
        assert_eq!(
            component.handle().selection().values(),
            vec!["x".to_string()]
        );
        assert_eq!(component.handle().options().len(), 2);
        assert_eq!(component.handle().search_term(), "");
        assert!(component.is_open(), "multiple-mode commit keeps it open");
    }

    #[test]
    fn test_mounted_component_dismisses_on_outside_press() {
        let registry = DismissRegistry::new();
        let component = fruit_select().mount(&registry);
        let element = component.handle().element().unwrap();

        component.toggle_dropdown();
        registry.pointer_down(&[element]);
        assert!(component.is_open());

        registry.pointer_down(&[]);
        assert!(!component.is_open());
    }
}
