//! State of the bound filter form.
//!
//! At most one [`FilterForm`] exists per page and at most one pending
//! submission exists per form. The handler drives it; this module only keeps
//! the values and answers the pending-indicator question.

use super::actions::TimerHandle;
use crate::domain::FilterQuery;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Element ids and field names of the filter form present on the page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FilterFormSpec {
    #[serde(default = "default_form_id")]
    pub form_id: String,
    /// Name of the search text field as submitted to the server.
    #[serde(default = "default_search_field")]
    pub search_field: String,
    /// Initial search text as rendered by the server.
    #[serde(default)]
    pub search: String,
    /// Dropdowns bound to the form, with their initial values.
    #[serde(default)]
    pub selectors: BTreeMap<String, String>,
}

fn default_form_id() -> String {
    "hangar-filter-form".to_string()
}

fn default_search_field() -> String {
    "q".to_string()
}

impl Default for FilterFormSpec {
    fn default() -> Self {
        Self {
            form_id: default_form_id(),
            search_field: default_search_field(),
            search: String::new(),
            selectors: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterForm {
    pub form_id: String,
    pub search_field: String,
    pub query: FilterQuery,
    /// The one scheduled-but-not-fired submission, if any.
    pub pending: Option<TimerHandle>,
    pub spinner_visible: bool,
}

impl FilterForm {
    #[must_use]
    pub fn from_spec(spec: FilterFormSpec) -> Self {
        Self {
            form_id: spec.form_id,
            search_field: spec.search_field,
            query: FilterQuery {
                search: spec.search,
                selectors: spec.selectors,
            },
            pending: None,
            spinner_visible: false,
        }
    }

    /// Whether an input event that changes the search text to `next` should
    /// show the pending indicator.
    ///
    /// Any non-empty value shows it. Clearing a non-empty field shows it too,
    /// so the refresh triggered by clearing is visible.
    #[must_use]
    pub fn indicator_for(&self, next: &str) -> bool {
        !next.is_empty() || !self.query.search.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_rules() {
        let mut form = FilterForm::from_spec(FilterFormSpec::default());

        // empty -> empty stays hidden
        assert!(!form.indicator_for(""));
        // empty -> text
        assert!(form.indicator_for("tri"));

        form.query.search = "tri".to_string();
        // text -> text
        assert!(form.indicator_for("trit"));
        // text -> empty
        assert!(form.indicator_for(""));
    }
}
