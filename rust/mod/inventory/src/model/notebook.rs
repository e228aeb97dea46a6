use serde::{Deserialize, Serialize};
use umscan_core::now_rfc3339;
use umscan_store::KvRecord;

/// Upper bound on ids produced by one batch create.
pub const MAX_BATCH: u32 = 500;

/// A notebook asset, keyed by its human-assigned asset tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    /// Asset tag. Globally unique.
    pub id: String,
    pub unit_id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Notebook {
    pub fn new(id: impl Into<String>, unit_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            unit_id: unit_id.into(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

impl KvRecord for Notebook {
    const KIND: &'static str = "notebook";

    fn kv_prefix() -> &'static str {
        "inventory:notebook:"
    }

    fn key_value(&self) -> String {
        self.id.clone()
    }

    fn before_create(&mut self) {
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
#[serde(rename_all = "camelCase")]
pub struct CreateNotebook {
    #[serde(default)]
    pub asset_tag: String,
    #[serde(default)]
    pub unit_id: String,
}

/// Create `prefix + zero-padded(i)` for every `i` in `start..=end`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreate {
    #[serde(default)]
    pub unit_id: String,
    #[serde(default)]
    pub prefix: String,
    pub start: Option<u32>,
    pub end: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignNotebook {
    #[serde(default)]
    pub unit_id: String,
}
