//! Search-bar text to filter conversion.
//!
//! The search box accepts whitespace-separated terms. A bare term becomes a
//! fuzzy match against the message column; a `key:value` term becomes an
//! equality filter on that key. Quoting and richer operators are left to the
//! backend's own query syntax.

use crate::logs::types::Filter;

pub fn search_to_filters(text: &str) -> Vec<Filter> {
    text.split_whitespace()
        .map(|term| match term.split_once(':') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                Filter::new(key, value, "==")
            }
            _ => Filter::new("message", term, "=~"),
        })
        .collect()
}
