use serde::{Deserialize, Serialize};
use umscan_core::{new_id, now_rfc3339, Role};
use umscan_store::KvRecord;

/// A user as stored. The password hash never leaves the service;
/// handlers return [`User`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,
    pub name: String,
    /// Sign-in e-mail, stored trimmed and lowercased.
    pub email: String,
    pub role: Role,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

impl KvRecord for UserRecord {
    const KIND: &'static str = "user";

    fn kv_prefix() -> &'static str {
        "auth:user:"
    }

    fn key_value(&self) -> String {
        self.id.clone()
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.email)
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

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

impl From<&UserRecord> for User {
    fn from(r: &UserRecord) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            email: r.email.clone(),
            role: r.role,
            created_at: r.created_at.clone(),
        }
    }
}

/// Input for creating a user. Every field is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

/// Input for editing a user. E-mail and password are not editable here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
}
