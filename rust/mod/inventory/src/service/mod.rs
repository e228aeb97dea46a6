pub mod notebook;
pub mod project;
pub mod roster;
pub mod unit;

use std::sync::Arc;

use umscan_core::ServiceError;
use umscan_kv::KVStore;
use umscan_store::KvOps;

use crate::model::{MobileUnit, Notebook, Project};

/// Inventory service: typed stores for each record kind plus the
/// business rules on top.
pub struct InventoryService {
    pub(crate) projects: KvOps<Project>,
    pub(crate) units: KvOps<MobileUnit>,
    pub(crate) notebooks: KvOps<Notebook>,
}

impl InventoryService {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self {
            projects: KvOps::new(kv.clone()),
            units: KvOps::new(kv.clone()),
            notebooks: KvOps::new(kv),
        }
    }
}

/// Trimmed copy of `value`, or a validation error naming `what`.
pub(crate) fn required(value: &str, what: &str) -> Result<String, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::Validation(format!("{} is required", what)));
    }
    Ok(value.to_string())
}

#[cfg(test)]
pub(crate) fn test_service() -> InventoryService {
    InventoryService::new(Arc::new(umscan_kv::MemoryStore::new()))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use umscan_kv::RedbStore;

    use super::*;
    use crate::model::{BatchCreate, CreateProject, UnitInput};

    fn open(path: &Path) -> InventoryService {
        InventoryService::new(Arc::new(RedbStore::open(path).unwrap()))
    }

    #[test]
    fn records_survive_reopening_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("umscan.redb");

        let unit_id = {
            let svc = open(&path);
            let p = svc.create_project(CreateProject { name: "Depot".into() }).unwrap();
            let u = svc
                .create_unit(UnitInput {
                    name: "UM 7".into(),
                    project_id: p.id,
                    expected_device_count: Some(serde_json::json!(3)),
                })
                .unwrap();
            let created = svc
                .batch_create_notebooks(BatchCreate {
                    unit_id: u.id.clone(),
                    prefix: "NB".into(),
                    start: Some(1),
                    end: Some(3),
                })
                .unwrap();
            assert_eq!(created, 3);
            u.id
        };

        let svc = open(&path);
        let summary = svc.summary().unwrap();
        assert_eq!((summary.projects, summary.units, summary.notebooks), (1, 1, 3));

        let data = svc.scanner_data().unwrap();
        assert_eq!(data.mobile_units.len(), 1);
        assert_eq!(data.mobile_units[0].name, "UM 7");
        assert!(data.notebooks.iter().all(|nb| nb.unit_id == unit_id));

        assert_eq!(svc.delete_unit_notebooks(&unit_id).unwrap(), 3);
        drop(svc);
        assert_eq!(open(&path).summary().unwrap().notebooks, 0);
    }
}
