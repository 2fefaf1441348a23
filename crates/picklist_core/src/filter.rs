//! Filter engine - derives the visible option subset from a search term
//!
//! A pure function of the pool and the term: no hidden state, no
//! debouncing. The control recomputes the view on every keystroke and
//! resets it to the full pool whenever the host replaces the pool.

use crate::option::SelectOption;

/// Compute the filtered view of `pool` for `term`.
///
/// Case-insensitive substring match against option labels. An empty
/// term returns the full pool unchanged. Pool order is preserved, so
/// the result is always a subset of `pool` in `pool`'s order.
pub fn filter_options<V: Clone>(pool: &[SelectOption<V>], term: &str) -> Vec<SelectOption<V>> {
    if term.is_empty() {
        return pool.to_vec();
    }
    pool.iter().filter(|opt| opt.matches(term)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit_pool() -> Vec<SelectOption<&'static str>> {
        vec![
            SelectOption::new("apple", "Apple"),
            SelectOption::new("banana", "Banana"),
            SelectOption::new("cherry", "Cherry"),
            SelectOption::new("pineapple", "Pineapple"),
        ]
    }

    #[test]
    fn test_empty_term_returns_full_pool() {
        let pool = fruit_pool();
        let view = filter_options(&pool, "");
        assert_eq!(view.len(), pool.len());
        for (a, b) in view.iter().zip(pool.iter()) {
            assert_eq!(a.value, b.value);
        }
    }

    #[test]
    fn test_case_insensitive_substring() {
        let pool = fruit_pool();
        let view = filter_options(&pool, "AP");
        let values: Vec<_> = view.iter().map(|o| o.value).collect();
        assert_eq!(values, vec!["apple", "pineapple"]);
    }

    #[test]
    fn test_order_preserved() {
        let pool = fruit_pool();
        let view = filter_options(&pool, "an");
        let values: Vec<_> = view.iter().map(|o| o.value).collect();
        assert_eq!(values, vec!["banana"]);

        let view = filter_options(&pool, "e");
        let values: Vec<_> = view.iter().map(|o| o.value).collect();
        assert_eq!(values, vec!["apple", "cherry", "pineapple"]);
    }

    #[test]
    fn test_no_match_yields_empty() {
        let pool = fruit_pool();
        assert!(filter_options(&pool, "durian").is_empty());
    }

    #[test]
    fn test_scenario_ap_against_apple_banana() {
        let pool = vec![
            SelectOption::new(1, "Apple"),
            SelectOption::new(2, "Banana"),
        ];
        let view = filter_options(&pool, "AP");
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].label, "Apple");
    }
}
