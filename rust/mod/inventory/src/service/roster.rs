use umscan_core::{natural_cmp, ServiceError};

use crate::model::{NotebookRef, ScannerData, Summary, UnitGroup, UnitRef};
use crate::service::InventoryService;

impl InventoryService {
    /// Every unit and every notebook, for the reconciliation screen.
    pub fn scanner_data(&self) -> Result<ScannerData, ServiceError> {
        let mut mobile_units: Vec<UnitRef> = self
            .units
            .list()?
            .into_iter()
            .map(|u| UnitRef { id: u.id, name: u.name })
            .collect();
        mobile_units.sort_by(|a, b| natural_cmp(&a.name, &b.name));

        let mut notebooks: Vec<NotebookRef> = self
            .notebooks
            .list()?
            .into_iter()
            .map(|n| NotebookRef { id: n.id, unit_id: n.unit_id })
            .collect();
        notebooks.sort_by(|a, b| natural_cmp(&a.id, &b.id));

        Ok(ScannerData { mobile_units, notebooks })
    }

    /// Each unit with its notebooks. Notebooks whose unit is gone are left out.
    pub fn grouped_notebooks(&self) -> Result<Vec<UnitGroup>, ServiceError> {
        let mut units = self.units.list()?;
        units.sort_by(|a, b| natural_cmp(&a.name, &b.name));
        let mut notebooks = self.notebooks.list()?;
        notebooks.sort_by(|a, b| natural_cmp(&a.id, &b.id));

        Ok(units
            .into_iter()
            .map(|unit| {
                let notebooks = notebooks
                    .iter()
                    .filter(|nb| nb.unit_id == unit.id)
                    .cloned()
                    .collect();
                UnitGroup { unit, notebooks }
            })
            .collect())
    }

    pub fn summary(&self) -> Result<Summary, ServiceError> {
        Ok(Summary {
            projects: self.projects.count()?,
            units: self.units.count()?,
            notebooks: self.notebooks.count()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{BatchCreate, CreateNotebook, CreateProject, UnitInput};
    use crate::service::test_service;

    #[test]
    fn scanner_data_lists_everything_sorted() {
        let svc = test_service();
        let p = svc.create_project(CreateProject { name: "P".into() }).unwrap();
        let u = svc
            .create_unit(UnitInput {
                name: "UM 1".into(),
                project_id: p.id,
                expected_device_count: Some(serde_json::json!(3)),
            })
            .unwrap();
        svc.batch_create_notebooks(BatchCreate {
            unit_id: u.id.clone(),
            prefix: "ITEM".into(),
            start: Some(9),
            end: Some(10),
        })
        .unwrap();
        svc.create_notebook(CreateNotebook { asset_tag: "ITEM2".into(), unit_id: u.id.clone() })
            .unwrap();

        let data = svc.scanner_data().unwrap();
        assert_eq!(data.mobile_units.len(), 1);
        assert_eq!(data.mobile_units[0].name, "UM 1");
        let ids: Vec<&str> = data.notebooks.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["ITEM2", "ITEM09", "ITEM10"]);
        assert!(data.notebooks.iter().all(|n| n.unit_id == u.id));

        let json = serde_json::to_value(&data).unwrap();
        assert!(json["mobileUnits"].is_array());
        assert_eq!(json["notebooks"][0]["unitId"], u.id.as_str());

        let summary = svc.summary().unwrap();
        assert_eq!((summary.projects, summary.units, summary.notebooks), (1, 1, 3));
    }

    #[test]
    fn grouped_view_skips_orphans() {
        let svc = test_service();
        let p = svc.create_project(CreateProject { name: "P".into() }).unwrap();
        let mk = |name: &str| {
            svc.create_unit(UnitInput {
                name: name.into(),
                project_id: p.id.clone(),
                expected_device_count: Some(serde_json::json!(1)),
            })
            .unwrap()
        };
        let keep = mk("Keep");
        let gone = mk("Gone");
        svc.create_notebook(CreateNotebook { asset_tag: "K1".into(), unit_id: keep.id.clone() })
            .unwrap();
        svc.create_notebook(CreateNotebook { asset_tag: "G1".into(), unit_id: gone.id.clone() })
            .unwrap();
        svc.delete_unit(&gone.id).unwrap();

        let groups = svc.grouped_notebooks().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].unit.id, keep.id);
        assert_eq!(groups[0].notebooks.len(), 1);
    }
}
