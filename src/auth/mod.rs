//! User accounts, password hashing, bearer tokens and the middleware that
//! guards protected routes.

mod log_in;
mod middleware;
mod password;
mod register_user;
mod token;
mod user;

pub use log_in::{LogInForm, LogInResponse, log_in};
pub use middleware::{AuthState, auth_guard};
pub use password::PasswordHash;
pub use register_user::{RegisterForm, RegisterResponse, register_user};
pub use token::{Claims, DEFAULT_TOKEN_DURATION, JwtKeys, decode_token, encode_token};
pub use user::{
    PublicUser, User, UserID, create_user, create_user_table, get_user_by_email, get_user_by_id,
};
