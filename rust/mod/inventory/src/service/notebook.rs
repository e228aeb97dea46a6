use umscan_core::{natural_cmp, ListParams, ListResult, ServiceError};

use crate::model::{BatchCreate, CreateNotebook, Notebook, ReassignNotebook, MAX_BATCH};
use crate::service::{required, InventoryService};

/// Asset tags end up in URL paths.
fn validate_tag(tag: &str) -> Result<String, ServiceError> {
    let tag = required(tag, "asset tag")?;
    if tag.contains('/') || tag.chars().any(char::is_whitespace) {
        return Err(ServiceError::Validation(format!(
            "asset tag '{}' may not contain '/' or spaces",
            tag
        )));
    }
    Ok(tag)
}

/// The ids a batch create produces: `prefix` + `i` padded to two digits.
pub fn batch_ids(prefix: &str, start: u32, end: u32) -> Vec<String> {
    (start..=end).map(|i| format!("{}{:02}", prefix, i)).collect()
}

impl InventoryService {
    fn existing_unit(&self, unit_id: &str) -> Result<String, ServiceError> {
        let unit_id = required(unit_id, "unitId")?;
        if self.units.get(&unit_id)?.is_none() {
            return Err(ServiceError::Validation(format!("unit '{}' does not exist", unit_id)));
        }
        Ok(unit_id)
    }

    /// Register one notebook. A taken asset tag conflicts.
    pub fn create_notebook(&self, input: CreateNotebook) -> Result<Notebook, ServiceError> {
        let tag = validate_tag(&input.asset_tag)?;
        let unit_id = self.existing_unit(&input.unit_id)?;
        let nb = self.notebooks.save_new(Notebook::new(tag, unit_id))?;
        tracing::info!(notebook = %nb.id, unit = %nb.unit_id, "notebook created");
        Ok(nb)
    }

    /// Create a numbered range of notebooks in one write.
    ///
    /// Existing notebooks with the same ids are reassigned to the unit.
    /// Returns the number of ids written.
    pub fn batch_create_notebooks(&self, input: BatchCreate) -> Result<usize, ServiceError> {
        let unit_id = self.existing_unit(&input.unit_id)?;
        let prefix = validate_tag(&input.prefix)
            .map_err(|_| ServiceError::Validation("prefix is required and may not contain '/' or spaces".into()))?;
        let (start, end) = match (input.start, input.end) {
            (Some(s), Some(e)) => (s, e),
            _ => return Err(ServiceError::Validation("start and end are required".into())),
        };
        if start > end {
            return Err(ServiceError::Validation(format!(
                "start ({}) must not be greater than end ({})",
                start, end
            )));
        }
        if end - start >= MAX_BATCH {
            return Err(ServiceError::Validation(format!(
                "a batch may create at most {} notebooks",
                MAX_BATCH
            )));
        }

        let records: Vec<Notebook> = batch_ids(&prefix, start, end)
            .into_iter()
            .map(|id| Notebook::new(id, unit_id.clone()))
            .collect();
        let saved = self.notebooks.save_batch(records)?;
        tracing::info!(unit = %unit_id, count = saved.len(), "notebook batch created");
        Ok(saved.len())
    }

    pub fn get_notebook(&self, id: &str) -> Result<Notebook, ServiceError> {
        self.notebooks.get_or_err(id)
    }

    /// Notebooks in natural asset-tag order, optionally for one unit.
    pub fn list_notebooks(
        &self,
        unit_id: Option<&str>,
        params: &ListParams,
    ) -> Result<ListResult<Notebook>, ServiceError> {
        self.notebooks.list_paginated(
            params,
            |nb| unit_id.map_or(true, |u| nb.unit_id == u),
            |a, b| natural_cmp(&a.id, &b.id),
        )
    }

    /// Move a notebook to another unit.
    pub fn reassign_notebook(&self, id: &str, input: ReassignNotebook) -> Result<Notebook, ServiceError> {
        let mut nb = self.notebooks.get_or_err(id)?;
        nb.unit_id = self.existing_unit(&input.unit_id)?;
        self.notebooks.save(nb)
    }

    pub fn delete_notebook(&self, id: &str) -> Result<(), ServiceError> {
        self.notebooks.delete(id)
    }

    /// Delete every notebook assigned to `unit_id` in one write.
    /// Returns how many were removed; zero is not an error.
    pub fn delete_unit_notebooks(&self, unit_id: &str) -> Result<usize, ServiceError> {
        let ids: Vec<String> = self
            .notebooks
            .list_where(|nb| nb.unit_id == unit_id)?
            .into_iter()
            .map(|nb| nb.id)
            .collect();
        if !ids.is_empty() {
            self.notebooks.delete_batch(&ids)?;
            tracing::info!(unit = %unit_id, count = ids.len(), "unit notebooks deleted");
        }
        Ok(ids.len())
    }
}
