use umscan_core::{ListParams, ListResult, Role};

use crate::model::{CreateUser, UpdateUser, User, UserRecord};
use crate::service::password::{hash_password, MIN_PASSWORD_LEN};
use crate::service::{AuthError, AuthService};

fn required(value: &str, what: &str) -> Result<String, AuthError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AuthError::Validation(format!("{} is required", what)));
    }
    Ok(value.to_string())
}

fn parse_role(value: &str) -> Result<Role, AuthError> {
    required(value, "role")?
        .parse()
        .map_err(AuthError::Validation)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    /// Create a new user.
    pub fn create_user(&self, input: CreateUser) -> Result<User, AuthError> {
        let name = required(&input.name, "name")?;
        let email = normalize_email(&required(&input.email, "email")?);
        if input.password.is_empty() {
            return Err(AuthError::Validation("password is required".into()));
        }
        let role = parse_role(&input.role)?;
        if !email.contains('@') {
            return Err(AuthError::Validation(format!("'{}' is not an e-mail address", email)));
        }
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.find_by_email(&email)?.is_some() {
            return Err(AuthError::Conflict("this e-mail is already in use".into()));
        }

        let record = UserRecord {
            id: String::new(),
            name,
            email,
            role,
            password_hash: hash_password(&input.password)?,
            created_at: String::new(),
            updated_at: String::new(),
        };
        let record = self.users.save_new(record)?;
        tracing::info!(user = %record.id, role = %record.role, "user created");
        Ok(User::from(&record))
    }

    /// Get a user by id.
    pub fn get_user(&self, id: &str) -> Result<User, AuthError> {
        Ok(User::from(&self.users.get_or_err(id)?))
    }

    /// List users, oldest first.
    pub fn list_users(&self, params: &ListParams) -> Result<ListResult<User>, AuthError> {
        let page = self
            .users
            .list_paginated(params, |_| true, |a, b| a.created_at.cmp(&b.created_at))?;
        Ok(ListResult {
            items: page.items.iter().map(User::from).collect(),
            total: page.total,
        })
    }

    /// Change a user's display name and role.
    pub fn update_user(&self, id: &str, input: UpdateUser) -> Result<User, AuthError> {
        let name = required(&input.name, "name")?;
        let role = parse_role(&input.role)?;

        let mut record = self.users.get_or_err(id)?;
        record.name = name;
        record.role = role;
        let record = self.users.save(record)?;
        Ok(User::from(&record))
    }

    /// Delete a user by id.
    pub fn delete_user(&self, id: &str) -> Result<(), AuthError> {
        self.users.delete(id)?;
        tracing::info!(user = %id, "user deleted");
        Ok(())
    }

    /// Find a user by e-mail (case-insensitive).
    pub fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let email = normalize_email(email);
        let all = self.users.list()?;
        Ok(all.into_iter().find(|u| u.email == email))
    }

    /// Create the configured MASTER account unless its e-mail is taken.
    ///
    /// `password_hash` is an argon2id PHC string from the server config.
    /// Returns true when the account was created.
    pub fn ensure_master(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, AuthError> {
        let email = normalize_email(&required(email, "master email")?);
        if let Some(existing) = self.find_by_email(&email)? {
            if existing.role != Role::Master {
                tracing::warn!(
                    user = %existing.id,
                    role = %existing.role,
                    "configured master e-mail belongs to a non-master user"
                );
            }
            return Ok(false);
        }

        let record = UserRecord {
            id: String::new(),
            name: required(name, "master name")?,
            email,
            role: Role::Master,
            password_hash: password_hash.to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        };
        let record = self.users.save_new(record)?;
        tracing::info!(user = %record.id, "created master account");
        Ok(true)
    }
}
