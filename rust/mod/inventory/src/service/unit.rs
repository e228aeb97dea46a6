use umscan_core::{natural_cmp, ListParams, ListResult, ServiceError};

use crate::model::{MobileUnit, UnitInput};
use crate::service::{required, InventoryService};

/// Accept `12` or `"12"`, like a form field would send it.
fn parse_count(value: Option<&serde_json::Value>) -> Result<u32, ServiceError> {
    let invalid = || {
        ServiceError::Validation("expectedDeviceCount must be a non-negative whole number".into())
    };
    match value {
        None | Some(serde_json::Value::Null) => Err(ServiceError::Validation(
            "expectedDeviceCount is required".into(),
        )),
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(invalid),
        Some(serde_json::Value::String(s)) => s.trim().parse::<u32>().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

impl InventoryService {
    fn validate_unit(&self, input: &UnitInput) -> Result<(String, String, u32), ServiceError> {
        let name = required(&input.name, "unit name")?;
        let project_id = required(&input.project_id, "projectId")?;
        let count = parse_count(input.expected_device_count.as_ref())?;
        if self.projects.get(&project_id)?.is_none() {
            return Err(ServiceError::Validation(format!(
                "project '{}' does not exist",
                project_id
            )));
        }
        Ok((name, project_id, count))
    }

    pub fn create_unit(&self, input: UnitInput) -> Result<MobileUnit, ServiceError> {
        let (name, project_id, expected_device_count) = self.validate_unit(&input)?;
        let unit = self.units.save_new(MobileUnit {
            id: String::new(),
            name,
            project_id,
            expected_device_count,
            created_at: String::new(),
            updated_at: String::new(),
        })?;
        tracing::info!(unit = %unit.id, name = %unit.name, "unit created");
        Ok(unit)
    }

    pub fn get_unit(&self, id: &str) -> Result<MobileUnit, ServiceError> {
        self.units.get_or_err(id)
    }

    /// Units in natural name order.
    pub fn list_units(&self, params: &ListParams) -> Result<ListResult<MobileUnit>, ServiceError> {
        self.units
            .list_paginated(params, |_| true, |a, b| natural_cmp(&a.name, &b.name))
    }

    /// Replace every editable field of a unit.
    pub fn update_unit(&self, id: &str, input: UnitInput) -> Result<MobileUnit, ServiceError> {
        let mut unit = self.units.get_or_err(id)?;
        let (name, project_id, expected_device_count) = self.validate_unit(&input)?;
        unit.name = name;
        unit.project_id = project_id;
        unit.expected_device_count = expected_device_count;
        self.units.save(unit)
    }

    /// Delete the unit record. Its notebooks keep their `unitId`.
    pub fn delete_unit(&self, id: &str) -> Result<(), ServiceError> {
        self.units.delete(id)?;
        tracing::info!(unit = %id, "unit deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CreateProject, CreateNotebook};
    use crate::service::test_service;

    fn input(name: &str, project: &str, count: serde_json::Value) -> UnitInput {
        UnitInput {
            name: name.into(),
            project_id: project.into(),
            expected_device_count: Some(count),
        }
    }

    #[test]
    fn unit_crud() {
        let svc = test_service();
        let p = svc.create_project(CreateProject { name: "P".into() }).unwrap();

        let u = svc.create_unit(input("UM 1", &p.id, serde_json::json!(30))).unwrap();
        assert_eq!(u.expected_device_count, 30);
        assert_eq!(svc.get_unit(&u.id).unwrap(), u);

        let u2 = svc.update_unit(&u.id, input("UM 1b", &p.id, serde_json::json!("32"))).unwrap();
        assert_eq!(u2.name, "UM 1b");
        assert_eq!(u2.expected_device_count, 32);

        svc.delete_unit(&u.id).unwrap();
        assert!(matches!(svc.get_unit(&u.id), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn unit_fields_are_required() {
        let svc = test_service();
        let p = svc.create_project(CreateProject { name: "P".into() }).unwrap();

        let cases = vec![
            input("", &p.id, serde_json::json!(1)),
            input("UM", "", serde_json::json!(1)),
            input("UM", &p.id, serde_json::json!(-1)),
            input("UM", &p.id, serde_json::json!("many")),
            input("UM", &p.id, serde_json::json!(2.5)),
            input("UM", "no-such-project", serde_json::json!(1)),
            UnitInput { name: "UM".into(), project_id: p.id.clone(), expected_device_count: None },
        ];
        for case in cases {
            assert!(matches!(svc.create_unit(case), Err(ServiceError::Validation(_))));
        }
        assert_eq!(svc.list_units(&ListParams::default()).unwrap().total, 0);
    }

    #[test]
    fn zero_expected_devices_is_allowed() {
        let svc = test_service();
        let p = svc.create_project(CreateProject { name: "P".into() }).unwrap();
        let u = svc.create_unit(input("Empty", &p.id, serde_json::json!(0))).unwrap();
        assert_eq!(u.expected_device_count, 0);
    }

    #[test]
    fn delete_leaves_notebooks_in_place() {
        let svc = test_service();
        let p = svc.create_project(CreateProject { name: "P".into() }).unwrap();
        let u = svc.create_unit(input("UM", &p.id, serde_json::json!(1))).unwrap();
        svc.create_notebook(CreateNotebook { asset_tag: "NB01".into(), unit_id: u.id.clone() })
            .unwrap();

        svc.delete_unit(&u.id).unwrap();
        let nb = svc.get_notebook("NB01").unwrap();
        assert_eq!(nb.unit_id, u.id);
    }

    #[test]
    fn units_list_in_natural_order() {
        let svc = test_service();
        let p = svc.create_project(CreateProject { name: "P".into() }).unwrap();
        for name in ["UM10", "UM2", "um1"] {
            svc.create_unit(input(name, &p.id, serde_json::json!(1))).unwrap();
        }
        let names: Vec<String> = svc
            .list_units(&ListParams::default())
            .unwrap()
            .items
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["um1", "UM2", "UM10"]);
    }
}
