use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::context::AppState;
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::{recipes, saved_recipes};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;

/// Recipes the current user has saved, joined through the association
/// table.
#[utoipa::path(
    get,
    path = "/saved_recipes",
    tag = "saved",
    responses(
        (status = 200, description = "Saved recipes", body = [Recipe]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn saved_recipes(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    match saved_recipes::table
        .inner_join(recipes::table)
        .filter(saved_recipes::user_id.eq(user.id))
        .select(Recipe::as_select())
        .load(&mut conn)
    {
        Ok(saved) => (StatusCode::OK, Json(saved)).into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch saved recipes: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch saved recipes".to_string(),
                }),
            )
                .into_response()
        }
    }
}
