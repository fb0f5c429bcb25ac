use crate::api::{ErrorResponse, MessageResponse};
use crate::context::AppState;
use crate::get_conn;
use crate::models::{NewComment, COMMENT_PENDING};
use crate::schema::comments;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Form, Json};
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitCommentRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Contact-form submission. New comments start out Pending with no reply.
#[utoipa::path(
    post,
    path = "/submit_comment",
    tag = "comments",
    request_body(content = SubmitCommentRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Comment submitted", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn submit_comment(
    State(state): State<AppState>,
    Form(req): Form<SubmitCommentRequest>,
) -> impl IntoResponse {
    for (value, name) in [(&req.name, "name"), (&req.email, "email"), (&req.message, "message")] {
        if value.trim().is_empty() {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Missing required field: {name}"),
                }),
            )
                .into_response();
        }
    }

    let mut conn = get_conn!(state.pool);

    let new_comment = NewComment {
        name: req.name.trim(),
        email: req.email.trim(),
        message: req.message.trim(),
        status: COMMENT_PENDING,
        date_posted: Utc::now().naive_utc(),
    };

    match diesel::insert_into(comments::table)
        .values(&new_comment)
        .execute(&mut conn)
    {
        Ok(_) => (
            StatusCode::CREATED,
            Json(MessageResponse {
                message: "Your message has been sent successfully!".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to save comment: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to submit comment".to_string(),
                }),
            )
                .into_response()
        }
    }
}
