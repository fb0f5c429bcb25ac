use crate::api::ErrorResponse;
use crate::auth::AuthPrincipal;
use crate::context::AppState;
use crate::get_conn;
use crate::models::Blog;
use crate::schema::blogs;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;

/// Single-post view, gated by authentication (either principal type).
#[utoipa::path(
    get,
    path = "/blog/{id}",
    tag = "blog",
    params(("id" = i32, Path, description = "Blog post ID")),
    responses(
        (status = 200, description = "Blog post", body = Blog),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Blog post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn get_blog(
    AuthPrincipal(_principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    match blogs::table.find(id).select(Blog::as_select()).first(&mut conn) {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(diesel::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Blog post not found".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch blog post: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch blog post".to_string(),
                }),
            )
                .into_response()
        }
    }
}
