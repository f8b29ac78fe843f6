// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod gate;
pub mod password;
pub mod rate_limit;
pub mod session;
pub mod token;

pub use gate::{authenticate, AdminUser, CurrentUser, MaybeUser};
pub use password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
pub use rate_limit::AuthRateLimiter;
pub use session::{IssuedToken, SessionIssuer};
pub use token::{Claims, TokenService};
