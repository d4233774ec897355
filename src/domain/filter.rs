//! Filter form values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current values of the filter form: the free-text search plus every
/// categorical selector, keyed by field name.
///
/// A submitted `FilterQuery` is a snapshot; later input never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterQuery {
    pub search: String,
    #[serde(default)]
    pub selectors: BTreeMap<String, String>,
}

impl FilterQuery {
    /// Returns the form encoded as query pairs, search first, empty values kept
    /// so the server sees a cleared field as cleared.
    #[must_use]
    pub fn to_pairs(&self, search_field: &str) -> Vec<(String, String)> {
        std::iter::once((search_field.to_string(), self.search.clone()))
            .chain(self.selectors.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect()
    }

    /// Resets the search text and every selector to empty.
    pub fn clear(&mut self) {
        self.search.clear();
        for value in self.selectors.values_mut() {
            value.clear();
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.selectors.values().all(String::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_keeps_selector_names() {
        let mut query = FilterQuery {
            search: "tritanium".to_string(),
            selectors: BTreeMap::from([
                ("division".to_string(), "3".to_string()),
                ("location".to_string(), "60003760".to_string()),
            ]),
        };

        query.clear();

        assert!(query.is_empty());
        assert_eq!(
            query.to_pairs("q"),
            vec![
                ("q".to_string(), String::new()),
                ("division".to_string(), String::new()),
                ("location".to_string(), String::new()),
            ]
        );
    }
}
