use crate::api::ErrorResponse;
use crate::context::AppState;
use crate::get_conn;
use crate::models::{Category, Recipe};
use crate::schema::{categories, recipes};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryPage {
    pub category: Category,
    pub recipes: Vec<Recipe>,
}

#[utoipa::path(
    get,
    path = "/category/{id}",
    tag = "recipes",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category and its recipes", body = CategoryPage),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn recipes_by_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let category: Category = match categories::table
        .find(id)
        .select(Category::as_select())
        .first(&mut conn)
    {
        Ok(c) => c,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Category not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch category: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch category".to_string(),
                }),
            )
                .into_response();
        }
    };

    match recipes::table
        .filter(recipes::category_id.eq(category.id))
        .select(Recipe::as_select())
        .load(&mut conn)
    {
        Ok(in_category) => (
            StatusCode::OK,
            Json(CategoryPage {
                category,
                recipes: in_category,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch category recipes: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch category recipes".to_string(),
                }),
            )
                .into_response()
        }
    }
}
