//! Description of what the server rendered on the current page.
//!
//! The coordinator binds opportunistically: every control listed here gets
//! bound, the filter submitter is bound only when a filter form is present,
//! and grid options are produced only for tables that exist.

use super::form::FilterFormSpec;
use crate::domain::{ControlKind, ControlLabel};
use crate::ui::grid::TableKind;
use serde::Deserialize;

/// A control as found in the page markup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ControlSpec {
    pub kind: ControlKind,
    /// `href` of the control. Unused for toggles.
    #[serde(default)]
    pub target_url: String,
    pub correlation_id: String,
    #[serde(default)]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub label: Option<ControlLabel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageLayout {
    #[serde(default)]
    pub controls: Vec<ControlSpec>,
    #[serde(default)]
    pub filter_form: Option<FilterFormSpec>,
    #[serde(default)]
    pub tables: Vec<TableKind>,
}

impl PageLayout {
    /// Parses a layout from the JSON blob a page embeds for the coordinator.
    ///
    /// # Errors
    ///
    /// Returns [`HangarError::Decode`](crate::HangarError::Decode) for malformed JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
