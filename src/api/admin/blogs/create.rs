use crate::api::forms::{FormData, FormError};
use crate::api::public::pages::StaticPage;
use crate::api::ErrorResponse;
use crate::context::AppState;
use crate::get_conn;
use crate::models::NewBlog;
use crate::schema::blogs;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

const DEFAULT_AUTHOR: &str = "Admin";

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBlogResponse {
    pub id: i32,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct BlogFormRequest {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[utoipa::path(
    get,
    path = "/admin/add_blog",
    tag = "admin",
    responses(
        (status = 200, description = "Add-blog page", body = StaticPage),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn add_blog_page() -> impl IntoResponse {
    Json(StaticPage { page: "add_blog" })
}

/// date_posted is fixed here at creation; edits never touch it.
#[utoipa::path(
    post,
    path = "/admin/add_blog",
    tag = "admin",
    request_body(content_type = "multipart/form-data", content = BlogFormRequest),
    responses(
        (status = 201, description = "Blog post created", body = CreateBlogResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn add_blog(State(state): State<AppState>, multipart: Multipart) -> impl IntoResponse {
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

    let image_key = match &form.image {
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

    let mut conn = get_conn!(state.pool);

    let new_blog = NewBlog {
        title,
        content,
        author: DEFAULT_AUTHOR,
        date_posted: Utc::now().naive_utc(),
        image: image_key.as_deref(),
        category: form.optional("category"),
    };

    match diesel::insert_into(blogs::table)
        .values(&new_blog)
        .returning(blogs::id)
        .get_result::<i32>(&mut conn)
    {
        Ok(id) => (StatusCode::CREATED, Json(CreateBlogResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to create blog post: {}", e);
            if let Some(key) = &image_key {
                state.images.remove(key).await;
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create blog post".to_string(),
                }),
            )
                .into_response()
        }
    }
}
