use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::{clear_session_cookie, delete_session, token_from_headers, AuthPrincipal};
use crate::context::AppState;
use crate::get_conn;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

/// Destroys the current session. Serves both /logout and /admin/logout;
/// the AuthPrincipal extractor enforces that a session exists.
#[utoipa::path(
    get,
    path = "/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn logout(
    AuthPrincipal(_principal): AuthPrincipal,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    // The extractor just resolved this token, so it is present.
    if let Some(token) = token_from_headers(&headers) {
        if let Err(e) = delete_session(&mut conn, &token) {
            tracing::error!("Failed to delete session: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to log out".to_string(),
                }),
            )
                .into_response();
        }
    }

    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(MessageResponse {
            message: "You have been logged out.".to_string(),
        }),
    )
        .into_response()
}
