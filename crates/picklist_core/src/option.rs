//! Option model shared by every other part of the control
//!
//! An option pairs a host-chosen identity value with a display label.
//! Identity is the `value` field alone: labels, icons, and other
//! presentation metadata never participate in equality, so the host
//! may supply fresh option instances across rebuilds without the
//! selection drifting.

/// One selectable entry in the option pool.
///
/// `V` is the host's identity type. Within one pool every `value` is
/// unique; the control compares options by value only.
#[derive(Clone, Debug)]
pub struct SelectOption<V> {
    /// The identity value (reported through selection and `on_change`)
    pub value: V,
    /// The display label shown in UI (also the filter target)
    pub label: String,
    /// Whether this option is disabled (toggles are silent no-ops)
    pub disabled: bool,
    /// Optional icon name for the renderer
    pub icon: Option<String>,
    /// Optional avatar image URL for the renderer
    pub avatar_url: Option<String>,
    /// Optional trailing metadata shown at the end of a dropdown row
    pub extra: Option<String>,
}

impl<V> SelectOption<V> {
    /// Create a new option with value and label
    pub fn new(value: V, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            disabled: false,
            icon: None,
            avatar_url: None,
            extra: None,
        }
    }

    /// Mark this option as disabled
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Set an icon name
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set an avatar image URL
    pub fn avatar_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }

    /// Set trailing metadata for the dropdown row
    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Check if this option matches a search query (case-insensitive)
    ///
    /// Matching is against the label only; the value is identity, not
    /// display text. An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.label.to_lowercase().contains(&query.to_lowercase())
    }
}

impl<V: PartialEq> SelectOption<V> {
    /// Compare identity with another option (value equality only)
    pub fn same_value(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// Equality is identity: two options are equal when their values are,
/// regardless of label or presentation metadata.
impl<V: PartialEq> PartialEq for SelectOption<V> {
    fn eq(&self, other: &Self) -> bool {
        self.same_value(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_builder() {
        let opt = SelectOption::new("us", "United States")
            .icon("flag")
            .extra("240M");
        assert_eq!(opt.value, "us");
        assert_eq!(opt.label, "United States");
        assert!(!opt.disabled);
        assert_eq!(opt.icon.as_deref(), Some("flag"));
        assert_eq!(opt.extra.as_deref(), Some("240M"));

        let disabled = SelectOption::new("uk", "United Kingdom").disabled();
        assert!(disabled.disabled);
    }

    #[test]
    fn test_matches_label_case_insensitive() {
        let opt = SelectOption::new("us", "United States");

        // Empty query matches everything
        assert!(opt.matches(""));

        assert!(opt.matches("united"));
        assert!(opt.matches("STATES"));
        assert!(opt.matches("d St"));

        assert!(!opt.matches("canada"));
    }

    #[test]
    fn test_matches_ignores_value() {
        // The value is identity, not display text
        let opt = SelectOption::new("us", "United States");
        assert!(!opt.matches("us") || opt.label.to_lowercase().contains("us"));

        let opt = SelectOption::new("zz", "Apple");
        assert!(!opt.matches("zz"));
    }

    #[test]
    fn test_same_value() {
        let a = SelectOption::new(1, "One");
        let b = SelectOption::new(1, "Uno");
        let c = SelectOption::new(2, "Two");
        assert!(a.same_value(&b));
        assert!(!a.same_value(&c));
    }
}
