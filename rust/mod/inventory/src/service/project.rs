use umscan_core::{merge_patch, ListParams, ListResult, ServiceError};

use crate::model::{CreateProject, Project};
use crate::service::{required, InventoryService};

impl InventoryService {
    pub fn create_project(&self, input: CreateProject) -> Result<Project, ServiceError> {
        let project = Project {
            id: String::new(),
            name: required(&input.name, "project name")?,
            created_at: String::new(),
            updated_at: String::new(),
        };
        let project = self.projects.save_new(project)?;
        tracing::info!(project = %project.id, name = %project.name, "project created");
        Ok(project)
    }

    pub fn get_project(&self, id: &str) -> Result<Project, ServiceError> {
        self.projects.get_or_err(id)
    }

    /// Projects, newest first.
    pub fn list_projects(&self, params: &ListParams) -> Result<ListResult<Project>, ServiceError> {
        self.projects
            .list_paginated(params, |_| true, |a, b| b.created_at.cmp(&a.created_at))
    }

    /// Apply a JSON merge patch. Only `name` is writable.
    pub fn update_project(&self, id: &str, patch: serde_json::Value) -> Result<Project, ServiceError> {
        let current = self.projects.get_or_err(id)?;

        let mut base = serde_json::to_value(&current)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        merge_patch(&mut base, &patch);
        base["id"] = serde_json::json!(current.id);
        base["createdAt"] = serde_json::json!(current.created_at);

        let mut updated: Project = serde_json::from_value(base)
            .map_err(|e| ServiceError::Validation(format!("invalid project: {}", e)))?;
        updated.name = required(&updated.name, "project name")?;
        self.projects.save(updated)
    }

    pub fn delete_project(&self, id: &str) -> Result<(), ServiceError> {
        self.projects.delete(id)?;
        tracing::info!(project = %id, "project deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_service;

    #[test]
    fn project_crud() {
        let svc = test_service();
        let p = svc
            .create_project(CreateProject { name: "  Campus North ".into() })
            .unwrap();
        assert_eq!(p.name, "Campus North");
        assert_eq!(p.id.len(), 32);

        let renamed = svc
            .update_project(&p.id, serde_json::json!({"name": "Campus South", "id": "hijack"}))
            .unwrap();
        assert_eq!(renamed.id, p.id);
        assert_eq!(renamed.name, "Campus South");
        assert_eq!(renamed.created_at, p.created_at);

        svc.delete_project(&p.id).unwrap();
        assert!(matches!(svc.get_project(&p.id), Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete_project(&p.id), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn blank_names_are_rejected() {
        let svc = test_service();
        let err = svc.create_project(CreateProject { name: "   ".into() }).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let p = svc.create_project(CreateProject { name: "A".into() }).unwrap();
        let err = svc.update_project(&p.id, serde_json::json!({"name": ""})).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = svc.update_project(&p.id, serde_json::json!({"name": null})).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn list_is_newest_first() {
        let svc = test_service();
        for name in ["first", "second", "third"] {
            svc.create_project(CreateProject { name: name.into() }).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        let list = svc.list_projects(&ListParams::default()).unwrap();
        let names: Vec<&str> = list.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
        assert_eq!(list.total, 3);
    }
}
