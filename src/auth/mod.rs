mod cookies;
mod crypto;
mod db;
mod extractor;
mod middleware;
mod principal;

pub use cookies::{clear_session_cookie, session_cookie};
pub use crypto::{hash_password, verify_password};
pub use db::{create_session, delete_session, ensure_admin};
pub use extractor::{token_from_headers, AuthAdmin, AuthPrincipal, AuthUser, MaybePrincipal};
pub use middleware::require_admin;
pub use principal::{Principal, PrincipalKind};
