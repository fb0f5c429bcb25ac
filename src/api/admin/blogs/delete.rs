use crate::api::ErrorResponse;
use crate::context::AppState;
use crate::get_conn;
use crate::schema::blogs;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;

#[utoipa::path(
    post,
    path = "/admin/delete_blog/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Blog post ID")),
    responses(
        (status = 204, description = "Blog post deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Blog post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn delete_blog(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let image: Option<Option<String>> = match blogs::table
        .find(id)
        .select(blogs::image)
        .first(&mut conn)
        .optional()
    {
        Ok(row) => row,
        Err(e) => {
            tracing::error!("Failed to fetch blog post: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete blog post".to_string(),
                }),
            )
                .into_response();
        }
    };

    let Some(image) = image else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Blog post not found".to_string(),
            }),
        )
            .into_response();
    };

    match diesel::delete(blogs::table.find(id)).execute(&mut conn) {
        Ok(_) => {
            if let Some(key) = &image {
                state.images.remove(key).await;
            }
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            tracing::error!("Failed to delete blog post: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete blog post".to_string(),
                }),
            )
                .into_response()
        }
    }
}
