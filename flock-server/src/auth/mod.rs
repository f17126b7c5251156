//! Authentication and authorization
//!
//! JWT bearer auth for station operators. The effective role is resolved
//! per request from token claims plus the explicit `admin` table fallback
//! (see [`roles`]); nothing role-related lives in ambient global state.

pub mod jwt;
pub mod middleware;
pub mod roles;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use roles::resolve_role;
