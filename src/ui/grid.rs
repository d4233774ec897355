//! Options handed to the external table widget.
//!
//! Sorting, paging and responsive layout are the widget's job; the coordinator
//! only knows which tables are on the page and how each is initialised.

use serde::{Deserialize, Serialize};

/// Tables the widget is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// `.hangar-table`: item listing, ascending by the first column.
    Hangar,
    /// `.transaction-table`: transaction log, newest first.
    Transaction,
}

impl TableKind {
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::Hangar => ".hangar-table",
            Self::Transaction => ".transaction-table",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Length menu entry; `-1` means "All".
const PAGE_LENGTHS: [i32; 4] = [25, 50, 100, -1];

/// Initialisation options in the shape the widget expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    pub order: Vec<(usize, SortDirection)>,
    pub page_length: i32,
    pub length_menu: (Vec<i32>, Vec<String>),
    pub responsive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dom: Option<String>,
}

impl GridOptions {
    #[must_use]
    pub fn for_table(kind: TableKind) -> Self {
        let labels = PAGE_LENGTHS
            .iter()
            .map(|&n| if n < 0 { "All".to_string() } else { n.to_string() })
            .collect();

        let (direction, dom) = match kind {
            TableKind::Hangar => (
                SortDirection::Asc,
                Some(r#"<"row"<"col-sm-6"l><"col-sm-6"f>>rtip"#.to_string()),
            ),
            TableKind::Transaction => (SortDirection::Desc, None),
        };

        Self {
            order: vec![(0, direction)],
            page_length: 50,
            length_menu: (PAGE_LENGTHS.to_vec(), labels),
            responsive: true,
            dom,
        }
    }

    /// JSON object passed to the widget constructor.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
