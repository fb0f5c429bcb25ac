use crate::api::ErrorResponse;
use crate::context::AppState;
use crate::get_conn;
use crate::models::COMMENT_PENDING;
use crate::schema::{blogs, comments, recipes};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub recipes: i64,
    pub blogs: i64,
    pub pending_comments: i64,
}

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "admin",
    responses(
        (status = 200, description = "Admin dashboard counts", body = DashboardResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let counts = (|| -> Result<DashboardResponse, diesel::result::Error> {
        Ok(DashboardResponse {
            recipes: recipes::table.count().get_result(&mut conn)?,
            blogs: blogs::table.count().get_result(&mut conn)?,
            pending_comments: comments::table
                .filter(comments::status.eq(COMMENT_PENDING))
                .count()
                .get_result(&mut conn)?,
        })
    })();

    match counts {
        Ok(counts) => (StatusCode::OK, Json(counts)).into_response(),
        Err(e) => {
            tracing::error!("Failed to load dashboard: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to load dashboard".to_string(),
                }),
            )
                .into_response()
        }
    }
}
