use serde::{Deserialize, Serialize};

use crate::model::{MobileUnit, Notebook};

/// Unit as listed by the roster feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRef {
    pub id: String,
    pub name: String,
}

/// Notebook as listed by the roster feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookRef {
    pub id: String,
    pub unit_id: String,
}

/// Body of `GET /inventory/v1/scanner-data`: everything the
/// reconciliation screen needs, fetched once per screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannerData {
    pub mobile_units: Vec<UnitRef>,
    pub notebooks: Vec<NotebookRef>,
}

/// A unit with its notebooks, for the grouped notebook view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitGroup {
    #[serde(flatten)]
    pub unit: MobileUnit,
    pub notebooks: Vec<Notebook>,
}

/// Record counts for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub projects: usize,
    pub units: usize,
    pub notebooks: usize,
}
