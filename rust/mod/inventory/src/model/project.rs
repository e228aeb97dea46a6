use serde::{Deserialize, Serialize};
use umscan_core::{new_id, now_rfc3339};
use umscan_store::KvRecord;

/// A customer project that mobile units are audited for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl KvRecord for Project {
    const KIND: &'static str = "project";

    fn kv_prefix() -> &'static str {
        "inventory:project:"
    }

    fn key_value(&self) -> String {
        self.id.clone()
    }

    fn search_text(&self) -> String {
        self.name.clone()
    }

    fn before_create(&mut self) {
        if self.id.is_empty() {
            self.id = new_id();
        }
        let now = now_rfc3339();
        if self.created_at.is_empty() {
            self.created_at = now.clone();
        }
        self.updated_at = now;
    }

    fn before_update(&mut self) {
        self.updated_at = now_rfc3339();
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProject {
    #[serde(default)]
    pub name: String,
}
