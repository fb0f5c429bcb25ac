use crate::api::ErrorResponse;
use crate::context::AppState;
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::recipes;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;

#[utoipa::path(
    get,
    path = "/admin/manage_recipes",
    tag = "admin",
    responses(
        (status = 200, description = "All recipes for the management view", body = [Recipe]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn manage_recipes(State(state): State<AppState>) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    match recipes::table.select(Recipe::as_select()).load(&mut conn) {
        Ok(all) => (StatusCode::OK, Json(all)).into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch recipes: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipes".to_string(),
                }),
            )
                .into_response()
        }
    }
}
