use crate::api::ErrorResponse;
use crate::context::AppState;
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::recipes;
use crate::sql::lower;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Case-insensitive substring matched against title, ingredients and
    /// description. Empty or absent returns every recipe.
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchResult {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

impl From<Recipe> for SearchResult {
    fn from(r: Recipe) -> Self {
        SearchResult {
            id: r.id,
            title: r.title,
            description: r.description,
            image: r.image,
        }
    }
}

/// Substring search, no ranking or pagination.
#[utoipa::path(
    get,
    path = "/search_recipes",
    tag = "recipes",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching recipes", body = [SearchResult]),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let query = params.q.unwrap_or_default();
    let query = query.trim();

    let mut conn = get_conn!(state.pool);

    let result = if query.is_empty() {
        recipes::table.select(Recipe::as_select()).load(&mut conn)
    } else {
        let pattern = format!("%{}%", query.to_lowercase());
        recipes::table
            .filter(
                lower(recipes::title)
                    .like(pattern.clone())
                    .or(lower(recipes::ingredients).like(pattern.clone()))
                    .or(lower(recipes::description).like(pattern)),
            )
            .select(Recipe::as_select())
            .load(&mut conn)
    };

    match result {
        Ok(matches) => {
            let results: Vec<SearchResult> = matches.into_iter().map(SearchResult::from).collect();
            (StatusCode::OK, Json(results)).into_response()
        }
        Err(e) => {
            tracing::error!("Recipe search failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Search failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}
