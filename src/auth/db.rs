use crate::db::DbPool;
use crate::models::{Admin, NewAdmin, NewSession, Session, User};
use crate::schema::{admins, sessions, users};
use chrono::{Duration, Utc};
use diesel::prelude::*;

use super::crypto::{generate_token, hash_token};
use super::principal::{Principal, PrincipalKind};

const SESSION_TTL_DAYS: i64 = 30;

/// Creates a session row for the principal and returns the raw token.
/// Only the SHA-256 of the token is persisted.
pub fn create_session(
    conn: &mut SqliteConnection,
    kind: PrincipalKind,
    principal_id: i32,
) -> Result<String, diesel::result::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = (Utc::now() + Duration::days(SESSION_TTL_DAYS)).naive_utc();

    let new_session = NewSession {
        principal_type: kind.as_str(),
        principal_id,
        token_hash: &token_hash,
        expires_at,
    };

    diesel::insert_into(sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(token)
}

/// Deletes the session identified by the raw token. Idempotent.
pub fn delete_session(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<usize, diesel::result::Error> {
    let token_hash = hash_token(token);
    diesel::delete(sessions::table.filter(sessions::token_hash.eq(&token_hash))).execute(conn)
}

/// Resolves a raw token to its principal, or None for unknown/expired
/// tokens and dangling sessions.
pub async fn get_principal_from_token(pool: &DbPool, token: &str) -> Option<Principal> {
    let mut conn = pool.get().ok()?;
    let token_hash = hash_token(token);

    let session: Session = sessions::table
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now().naive_utc()))
        .select(Session::as_select())
        .first(&mut conn)
        .ok()?;

    match PrincipalKind::parse(&session.principal_type)? {
        PrincipalKind::User => users::table
            .find(session.principal_id)
            .select(User::as_select())
            .first(&mut conn)
            .ok()
            .map(Principal::User),
        PrincipalKind::Admin => admins::table
            .find(session.principal_id)
            .select(Admin::as_select())
            .first(&mut conn)
            .ok()
            .map(Principal::Admin),
    }
}

/// Startup bootstrap for the single admin account. Admins are never
/// provisioned over HTTP; registration only creates users.
pub fn ensure_admin(conn: &mut SqliteConnection, username: &str, password: &str) {
    let existing: Option<i32> = admins::table
        .filter(admins::username.eq(username))
        .select(admins::id)
        .first(conn)
        .optional()
        .expect("Failed to query admins table");

    if existing.is_some() {
        return;
    }

    let password_hash = super::hash_password(password).expect("Failed to hash admin password");

    diesel::insert_into(admins::table)
        .values(&NewAdmin {
            username,
            password_hash: &password_hash,
        })
        .execute(conn)
        .expect("Failed to create admin account");

    tracing::info!(username, "Bootstrapped admin account");
}
