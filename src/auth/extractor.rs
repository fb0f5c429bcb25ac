use crate::api::ErrorResponse;
use crate::context::AppContext;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::cookies::SESSION_COOKIE;
use super::db::get_principal_from_token;
use super::principal::Principal;

/// Extractor that requires an authenticated end user.
///
/// ```ignore
/// async fn my_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     // user is the authenticated User row
/// }
/// ```
pub struct AuthUser(pub crate::models::User);

/// Extractor that requires an authenticated administrator.
pub struct AuthAdmin(pub crate::models::Admin);

/// Extractor that accepts either principal type.
pub struct AuthPrincipal(pub Principal);

/// Extractor that never rejects; used by the identity probe.
pub struct MaybePrincipal(pub Option<Principal>);

pub enum AuthError {
    MissingCredentials,
    InvalidToken,
    AdminOnly,
    UserOnly,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Authentication required")
            }
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired session"),
            AuthError::AdminOnly => (StatusCode::FORBIDDEN, "Administrator access required"),
            AuthError::UserOnly => (StatusCode::FORBIDDEN, "User account required"),
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Pulls the session token out of `Authorization: Bearer` or, failing that,
/// the `session` cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Some(token) = value.to_str().ok().and_then(|s| s.strip_prefix("Bearer ")) {
            return Some(token.to_string());
        }
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(SESSION_COOKIE).and_then(|rest| rest.strip_prefix('=')))
        .map(|token| token.to_string())
}

async fn resolve_principal<S>(parts: &Parts, state: &S) -> Result<Principal, AuthError>
where
    S: Send + Sync,
    Arc<AppContext>: FromRef<S>,
{
    let context = Arc::<AppContext>::from_ref(state);

    let token = token_from_headers(&parts.headers).ok_or(AuthError::MissingCredentials)?;

    get_principal_from_token(&context.pool, &token)
        .await
        .ok_or(AuthError::InvalidToken)
}

impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
    Arc<AppContext>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        resolve_principal(parts, state).await.map(AuthPrincipal)
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppContext>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match resolve_principal(parts, state).await? {
            Principal::User(user) => Ok(AuthUser(user)),
            Principal::Admin(_) => Err(AuthError::UserOnly),
        }
    }
}

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
    Arc<AppContext>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match resolve_principal(parts, state).await? {
            Principal::Admin(admin) => Ok(AuthAdmin(admin)),
            Principal::User(_) => Err(AuthError::AdminOnly),
        }
    }
}

impl<S> FromRequestParts<S> for MaybePrincipal
where
    S: Send + Sync,
    Arc<AppContext>: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybePrincipal(resolve_principal(parts, state).await.ok()))
    }
}
