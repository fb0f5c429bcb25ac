use crate::api::ErrorResponse;
use crate::context::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::db::get_principal_from_token;
use super::extractor::token_from_headers;

/// Middleware that requires an admin session for all requests.
/// Applied to the whole /admin route group (except login); handlers that
/// need the admin's identity additionally use the AuthAdmin extractor.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let token = match token_from_headers(request.headers()) {
        Some(t) => t,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Authentication required".to_string(),
                }),
            )
                .into_response()
        }
    };

    match get_principal_from_token(&state.pool, &token).await {
        Some(principal) if principal.is_admin() => next.run(request).await,
        Some(_) => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "Administrator access required".to_string(),
            }),
        )
            .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Invalid or expired session".to_string(),
            }),
        )
            .into_response(),
    }
}
