use crate::api::forms::{FormData, FormError};
use crate::api::{ErrorResponse, MessageResponse};
use crate::context::AppState;
use crate::get_conn;
use crate::models::Blog;
use crate::schema::blogs;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;

/// Everything an edit may change; author and date_posted are immutable
/// after creation.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::blogs)]
#[diesel(treat_none_as_null = true)]
struct BlogChanges<'a> {
    title: &'a str,
    content: &'a str,
    image: Option<&'a str>,
    category: Option<&'a str>,
}

#[utoipa::path(
    get,
    path = "/admin/edit_blog/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Blog post ID")),
    responses(
        (status = 200, description = "Blog post for the edit form", body = Blog),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Blog post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn edit_blog_page(
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

#[utoipa::path(
    post,
    path = "/admin/edit_blog/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Blog post ID")),
    request_body(content_type = "multipart/form-data", content = super::create::BlogFormRequest),
    responses(
        (status = 200, description = "Blog post updated", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Blog post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn edit_blog(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> impl IntoResponse {
    let form = match FormData::from_multipart(multipart).await {
        Ok(f) => f,
        Err(e) => return e.into_response(),
    };

    let required: Result<_, FormError> =
        (|| Ok((form.required("title")?, form.required("content")?)))();
    let (title, content) = match required {
        Ok(fields) => fields,
        Err(e) => return e.into_response(),
    };

    let mut conn = get_conn!(state.pool);

    let existing: Blog = match blogs::table
        .find(id)
        .select(Blog::as_select())
        .first(&mut conn)
    {
        Ok(post) => post,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Blog post not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch blog post: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update blog post".to_string(),
                }),
            )
                .into_response();
        }
    };

    let new_image_key = match &form.image {
        Some(upload) => match state.images.save(&upload.data).await {
            Ok(key) => Some(key),
            Err(e) if e.is_client_error() => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: e.user_message(),
                    }),
                )
                    .into_response()
            }
            Err(e) => {
                tracing::error!(filename = %upload.filename, "Failed to store image: {}", e.user_message());
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to store image".to_string(),
                    }),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let changes = BlogChanges {
        title,
        content,
        image: new_image_key.as_deref().or(existing.image.as_deref()),
        category: form.optional("category"),
    };

    match diesel::update(blogs::table.find(id))
        .set(&changes)
        .execute(&mut conn)
    {
        Ok(_) => {
            if new_image_key.is_some() {
                if let Some(old) = &existing.image {
                    state.images.remove(old).await;
                }
            }
            (
                StatusCode::OK,
                Json(MessageResponse {
                    message: "Blog updated successfully!".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to update blog post: {}", e);
            if let Some(key) = &new_image_key {
                state.images.remove(key).await;
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update blog post".to_string(),
                }),
            )
                .into_response()
        }
    }
}
