use crate::api::{ErrorResponse, MessageResponse};
use crate::context::AppState;
use crate::get_conn;
use crate::models::{Comment, COMMENT_REPLIED};
use crate::schema::comments;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Form, Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplyCommentRequest {
    pub reply: String,
}

#[utoipa::path(
    get,
    path = "/admin/comments",
    tag = "admin",
    responses(
        (status = 200, description = "All comments, newest first", body = [Comment]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn list_comments(State(state): State<AppState>) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    match comments::table
        .select(Comment::as_select())
        .order(comments::date_posted.desc())
        .load(&mut conn)
    {
        Ok(all) => (StatusCode::OK, Json(all)).into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch comments: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch comments".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Stores the reply and flips the comment Pending -> Replied. The
/// transition happens exactly once; a second reply is rejected.
#[utoipa::path(
    post,
    path = "/admin/reply_comment/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Comment ID")),
    request_body(content = ReplyCommentRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Reply stored", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse),
        (status = 409, description = "Comment already replied", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn reply_comment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(req): Form<ReplyCommentRequest>,
) -> impl IntoResponse {
    let reply = req.reply.trim();
    if reply.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Reply cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(state.pool);

    let comment: Comment = match comments::table
        .find(id)
        .select(Comment::as_select())
        .first(&mut conn)
    {
        Ok(c) => c,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Comment not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch comment: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch comment".to_string(),
                }),
            )
                .into_response();
        }
    };

    if comment.status == COMMENT_REPLIED {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Comment has already been replied to".to_string(),
            }),
        )
            .into_response();
    }

    match diesel::update(comments::table.find(id))
        .set((
            comments::reply.eq(reply),
            comments::status.eq(COMMENT_REPLIED),
        ))
        .execute(&mut conn)
    {
        Ok(_) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Reply sent successfully!".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to store reply: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to store reply".to_string(),
                }),
            )
                .into_response()
        }
    }
}
