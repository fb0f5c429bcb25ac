use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::context::AppState;
use crate::get_conn;
use crate::models::NewSavedRecipe;
use crate::schema::{recipes, saved_recipes};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;

/// Idempotent save. The (user_id, recipe_id) unique index plus
/// INSERT OR IGNORE makes this a single atomic conditional insert: two
/// concurrent saves cannot both create a row, and the second caller gets
/// the "already saved" message.
#[utoipa::path(
    post,
    path = "/save_recipe/{id}",
    tag = "saved",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Saved, or already saved", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn save_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let exists: Option<i32> = match recipes::table
        .find(recipe_id)
        .select(recipes::id)
        .first(&mut conn)
        .optional()
    {
        Ok(found) => found,
        Err(e) => {
            tracing::error!("Failed to look up recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to save recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    if exists.is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe not found".to_string(),
            }),
        )
            .into_response();
    }

    let inserted = diesel::insert_or_ignore_into(saved_recipes::table)
        .values(&NewSavedRecipe {
            user_id: user.id,
            recipe_id,
        })
        .execute(&mut conn);

    match inserted {
        Ok(0) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "You already saved this recipe!".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Recipe saved successfully!".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to save recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to save recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
