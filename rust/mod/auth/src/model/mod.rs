mod session;
mod user;

pub use session::{Claims, LoginRequest, MeResponse, TokenResponse};
pub use user::{CreateUser, UpdateUser, User, UserRecord};
