pub mod auth;
pub mod config;
pub mod error;
pub mod module;
pub mod role;
pub mod sort;
pub mod types;

pub use auth::{Authenticator, DenyAll, Identity, StaticIdentity};
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use module::Module;
pub use role::{Admission, Area, Destination, Role, SessionStatus};
pub use sort::natural_cmp;
pub use types::{ListParams, ListResult, Message, merge_patch, new_id, now_rfc3339};
