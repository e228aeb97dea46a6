//! Roles and the screen-gating table.
//!
//! Every signed-in identity carries exactly one [`Role`]. The role decides
//! where the identity lands after sign-in and which [`Area`]s it may reach.
//! The table is shared by the server (which answers 403 where a screen would
//! redirect) and by clients (which follow the redirect).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Access role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Technician. Runs reconciliation counts.
    User,
    /// Manages projects, units and notebooks.
    Admin,
    /// Admin that may also manage users.
    Master,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
            Role::Master => "MASTER",
        }
    }

    /// Where this role lands right after sign-in.
    pub fn home(&self) -> Destination {
        match self {
            Role::User => Destination::Scanner,
            Role::Admin | Role::Master => Destination::Dashboard,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            "MASTER" => Ok(Role::Master),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Sign-in state as seen by a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// The identity check has not answered yet.
    Loading,
    SignedOut,
    SignedIn(Role),
}

/// Screens a router may send an identity to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Login,
    Scanner,
    Dashboard,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::Login => "/login",
            Destination::Scanner => "/scanner",
            Destination::Dashboard => "/dashboard",
        }
    }
}

/// Outcome of gating a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Render nothing until the identity check answers.
    Wait,
    Allow,
    Redirect(Destination),
}

/// Gated groups of screens and endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// Reconciliation screen. Technicians only.
    Scanner,
    /// Project, unit and notebook managers.
    Records,
    /// User manager.
    Users,
}

impl Area {
    pub fn as_str(&self) -> &'static str {
        match self {
            Area::Scanner => "scanner",
            Area::Records => "records",
            Area::Users => "users",
        }
    }

    /// Decide whether `status` may enter this area.
    pub fn admit(&self, status: &SessionStatus) -> Admission {
        let role = match status {
            SessionStatus::Loading => return Admission::Wait,
            SessionStatus::SignedOut => return Admission::Redirect(Destination::Login),
            SessionStatus::SignedIn(role) => *role,
        };

        match (self, role) {
            (Area::Scanner, Role::User) => Admission::Allow,
            (Area::Scanner, _) => Admission::Redirect(Destination::Dashboard),
            (Area::Records, Role::Admin | Role::Master) => Admission::Allow,
            (Area::Records, Role::User) => Admission::Redirect(Destination::Scanner),
            (Area::Users, Role::Master) => Admission::Allow,
            (Area::Users, Role::Admin) => Admission::Redirect(Destination::Dashboard),
            (Area::Users, Role::User) => Admission::Redirect(Destination::Scanner),
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Landing decision for the root screen.
pub fn landing(status: &SessionStatus) -> Admission {
    match status {
        SessionStatus::Loading => Admission::Wait,
        SessionStatus::SignedOut => Admission::Redirect(Destination::Login),
        SessionStatus::SignedIn(role) => Admission::Redirect(role.home()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in(role: Role) -> SessionStatus {
        SessionStatus::SignedIn(role)
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!(" Master ".parse::<Role>().unwrap(), Role::Master);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        let back: Role = serde_json::from_str("\"MASTER\"").unwrap();
        assert_eq!(back, Role::Master);
    }

    #[test]
    fn landing_follows_role() {
        assert_eq!(landing(&SessionStatus::Loading), Admission::Wait);
        assert_eq!(landing(&SessionStatus::SignedOut), Admission::Redirect(Destination::Login));
        assert_eq!(landing(&signed_in(Role::User)), Admission::Redirect(Destination::Scanner));
        assert_eq!(landing(&signed_in(Role::Admin)), Admission::Redirect(Destination::Dashboard));
        assert_eq!(landing(&signed_in(Role::Master)), Admission::Redirect(Destination::Dashboard));
    }

    #[test]
    fn scanner_is_technician_only() {
        assert_eq!(Area::Scanner.admit(&signed_in(Role::User)), Admission::Allow);
        assert_eq!(
            Area::Scanner.admit(&signed_in(Role::Admin)),
            Admission::Redirect(Destination::Dashboard)
        );
        assert_eq!(
            Area::Scanner.admit(&signed_in(Role::Master)),
            Admission::Redirect(Destination::Dashboard)
        );
    }

    #[test]
    fn records_need_admin_or_master() {
        assert_eq!(Area::Records.admit(&signed_in(Role::Admin)), Admission::Allow);
        assert_eq!(Area::Records.admit(&signed_in(Role::Master)), Admission::Allow);
        assert_eq!(
            Area::Records.admit(&signed_in(Role::User)),
            Admission::Redirect(Destination::Scanner)
        );
    }

    #[test]
    fn users_need_master() {
        assert_eq!(Area::Users.admit(&signed_in(Role::Master)), Admission::Allow);
        assert_eq!(
            Area::Users.admit(&signed_in(Role::Admin)),
            Admission::Redirect(Destination::Dashboard)
        );
        assert_eq!(
            Area::Users.admit(&signed_in(Role::User)),
            Admission::Redirect(Destination::Scanner)
        );
    }

    #[test]
    fn loading_and_signed_out_never_allow() {
        for area in [Area::Scanner, Area::Records, Area::Users] {
            assert_eq!(area.admit(&SessionStatus::Loading), Admission::Wait);
            assert_eq!(
                area.admit(&SessionStatus::SignedOut),
                Admission::Redirect(Destination::Login)
            );
        }
    }
}
