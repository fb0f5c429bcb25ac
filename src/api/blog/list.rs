use crate::api::ErrorResponse;
use crate::context::AppState;
use crate::get_conn;
use crate::models::Blog;
use crate::schema::blogs;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;

#[utoipa::path(
    get,
    path = "/blog",
    tag = "blog",
    responses(
        (status = 200, description = "All blog posts, newest first", body = [Blog]),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
pub async fn list_blogs(State(state): State<AppState>) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    match blogs::table
        .select(Blog::as_select())
        .order(blogs::date_posted.desc())
        .load(&mut conn)
    {
        Ok(posts) => (StatusCode::OK, Json(posts)).into_response(),
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
