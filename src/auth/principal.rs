use crate::models::{Admin, User};

/// The two identity spaces sharing one session mechanism. A session row
/// records which table its principal lives in, so resolution is a tagged
/// lookup rather than probing both tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalKind {
    User,
    Admin,
}

impl PrincipalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrincipalKind::User => "user",
            PrincipalKind::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(PrincipalKind::User),
            "admin" => Some(PrincipalKind::Admin),
            _ => None,
        }
    }
}

/// An authenticated identity, resolved once per request from the session
/// token.
#[derive(Debug, Clone)]
pub enum Principal {
    User(User),
    Admin(Admin),
}

impl Principal {
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::User(_) => PrincipalKind::User,
            Principal::Admin(_) => PrincipalKind::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin(_))
    }

    pub fn username(&self) -> &str {
        match self {
            Principal::User(user) => &user.username,
            Principal::Admin(admin) => &admin.username,
        }
    }
}
