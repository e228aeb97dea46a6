//! Roster snapshot for the reconciliation screen.
//!
//! The full unit and notebook lists are fetched once per screen. Selecting a
//! unit carves its roster out of that snapshot; later changes on the server
//! are not seen until the screen is opened again.

use inventory::model::{ScannerData, UnitRef};
use umscan_core::natural_cmp;

use crate::error::ScanError;

/// Load state of the roster feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RosterLoader {
    #[default]
    Loading,
    Ready(ScannerData),
    Failed(String),
}

/// Expected notebooks of one unit, in natural order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub unit: UnitRef,
    pub ids: Vec<String>,
}

impl RosterLoader {
    /// Settle the loader with the outcome of the roster fetch.
    pub fn settle<E: std::fmt::Display>(result: Result<ScannerData, E>) -> Self {
        match result {
            Ok(data) => RosterLoader::Ready(data),
            Err(e) => RosterLoader::Failed(e.to_string()),
        }
    }

    /// Unit selection is only possible once the feed is ready.
    pub fn selection_enabled(&self) -> bool {
        matches!(self, RosterLoader::Ready(_))
    }

    /// Units offered for selection, natural-sorted by name.
    pub fn units(&self) -> Vec<UnitRef> {
        match self {
            RosterLoader::Ready(data) => {
                let mut units = data.mobile_units.clone();
                units.sort_by(|a, b| natural_cmp(&a.name, &b.name));
                units
            }
            _ => Vec::new(),
        }
    }

    /// Find a unit by id, or by exact name when no id matches.
    pub fn find_unit(&self, key: &str) -> Result<UnitRef, ScanError> {
        let data = self.ready()?;
        data.mobile_units
            .iter()
            .find(|u| u.id == key)
            .or_else(|| data.mobile_units.iter().find(|u| u.name == key))
            .cloned()
            .ok_or_else(|| ScanError::UnknownUnit(key.to_string()))
    }

    /// Build the roster of `unit_id`.
    pub fn roster(&self, unit_id: &str) -> Result<Roster, ScanError> {
        let unit = self.find_unit(unit_id)?;
        let data = self.ready()?;
        let mut ids: Vec<String> = data
            .notebooks
            .iter()
            .filter(|n| n.unit_id == unit.id)
            .map(|n| n.id.clone())
            .collect();
        ids.sort_by(|a, b| natural_cmp(a, b));
        ids.dedup();
        Ok(Roster { unit, ids })
    }

    /// The loaded feed, or why there is none.
    pub fn ready(&self) -> Result<&ScannerData, ScanError> {
        match self {
            RosterLoader::Ready(data) => Ok(data),
            RosterLoader::Loading => Err(ScanError::RosterLoading),
            RosterLoader::Failed(reason) => Err(ScanError::RosterUnavailable(reason.clone())),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_data() -> ScannerData {
    use inventory::model::NotebookRef;

    let nb = |id: &str, unit: &str| NotebookRef {
        id: id.into(),
        unit_id: unit.into(),
    };
    ScannerData {
        mobile_units: vec![
            UnitRef { id: "u2".into(), name: "UM 10".into() },
            UnitRef { id: "u1".into(), name: "UM 2".into() },
            UnitRef { id: "u3".into(), name: "UM empty".into() },
        ],
        notebooks: vec![
            nb("A3", "u1"),
            nb("A10", "u1"),
            nb("A1", "u1"),
            nb("A2", "u1"),
            nb("B1", "u2"),
            nb("B2", "u2"),
        ],
    }
}
