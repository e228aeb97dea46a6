use serde::{Deserialize, Serialize};

/// Query parameters accepted by list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    /// Maximum number of results to return.
    #[serde(default = "default_limit")]
    pub limit: usize,

    #[serde(default)]
    pub offset: usize,

    /// Case-insensitive substring filter on the record's display name.
    #[serde(default)]
    pub q: Option<String>,
}

fn default_limit() -> usize {
    50
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            q: None,
        }
    }
}

impl ListParams {
    /// True when `text` passes the `q` filter.
    pub fn matches(&self, text: &str) -> bool {
        match self.q.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(q) => text.to_lowercase().contains(&q.to_lowercase()),
        }
    }
}

/// Result wrapper for list operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Body of a successful mutation: `{"message": "...", "id": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }

    pub fn with_id(message: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: Some(id.into()),
        }
    }
}

/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string().replace('-', "")
}

/// Get the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Merge a JSON patch into a base value (RFC 7386).
///
/// `null` removes the key, objects merge recursively, anything else replaces.
pub fn merge_patch(base: &mut serde_json::Value, patch: &serde_json::Value) {
    if let (Some(base_obj), Some(patch_obj)) = (base.as_object_mut(), patch.as_object()) {
        for (key, value) in patch_obj {
            if value.is_null() {
                base_obj.remove(key);
            } else if value.is_object() {
                let entry = base_obj
                    .entry(key.clone())
                    .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
                merge_patch(entry, value);
            } else {
                base_obj.insert(key.clone(), value.clone());
            }
        }
    } else {
        *base = patch.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_compact_uuid() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(!id.contains('-'));
        assert_ne!(id, new_id());
    }

    #[test]
    fn merge_patch_removes_nulls_and_merges_objects() {
        let mut base = serde_json::json!({"name": "Alpha", "notes": "x", "meta": {"a": 1}});
        let patch = serde_json::json!({"notes": null, "meta": {"b": 2}, "name": "Beta"});
        merge_patch(&mut base, &patch);
        assert_eq!(
            base,
            serde_json::json!({"name": "Beta", "meta": {"a": 1, "b": 2}})
        );
    }

    #[test]
    fn list_params_filter() {
        let all = ListParams::default();
        assert!(all.matches("anything"));

        let q = ListParams {
            q: Some(" lab ".into()),
            ..Default::default()
        };
        assert!(q.matches("Computer LAB 2"));
        assert!(!q.matches("Library"));
    }

    #[test]
    fn message_omits_missing_id() {
        let json = serde_json::to_value(Message::new("done")).unwrap();
        assert_eq!(json, serde_json::json!({"message": "done"}));
        let json = serde_json::to_value(Message::with_id("created", "p1")).unwrap();
        assert_eq!(json["id"], "p1");
    }
}
