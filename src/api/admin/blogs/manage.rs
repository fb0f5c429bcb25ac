use crate::api::ErrorResponse;
use crate::context::AppState;
use crate::get_conn;
use crate::models::Blog;
use crate::schema::blogs;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;

#[utoipa::path(
    get,
    path = "/admin/manage_blogs",
    tag = "admin",
    responses(
        (status = 200, description = "All blog posts for the management view", body = [Blog]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn manage_blogs(State(state): State<AppState>) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    match blogs::table.select(Blog::as_select()).load(&mut conn) {
        Ok(all) => (StatusCode::OK, Json(all)).into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch blog posts: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch blog posts".to_string(),
                }),
            )
                .into_response()
        }
    }
}
