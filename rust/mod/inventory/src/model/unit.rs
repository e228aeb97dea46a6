use serde::{Deserialize, Serialize};
use umscan_core::{new_id, now_rfc3339};
use umscan_store::KvRecord;

/// A mobile unit ("UM"): one physical location or batch being audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileUnit {
    pub id: String,
    pub name: String,
    pub project_id: String,
    pub expected_device_count: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl KvRecord for MobileUnit {
    const KIND: &'static str = "unit";

    fn kv_prefix() -> &'static str {
        "inventory:unit:"
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

/// Body of unit create and update. Every field is required.
///
/// `expectedDeviceCount` may be sent as a number or a numeric string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub expected_device_count: Option<serde_json::Value>,
}
