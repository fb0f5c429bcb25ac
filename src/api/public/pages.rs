use crate::api::ErrorResponse;
use crate::auth::MaybePrincipal;
use crate::context::AppState;
use crate::get_conn;
use crate::models::{Blog, Category, Recipe};
use crate::schema::{blogs, categories, recipes};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

const FEATURED_RECIPES: i64 = 3;
const LATEST_BLOGS: i64 = 3;

#[derive(Debug, Serialize, ToSchema)]
pub struct HomePage {
    pub categories: Vec<Category>,
    pub featured_recipes: Vec<Recipe>,
    pub latest_blogs: Vec<Blog>,
}

/// Payload for pages with no dynamic data; the template layer owns the rest.
#[derive(Debug, Serialize, ToSchema)]
pub struct StaticPage {
    pub page: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "pages",
    responses(
        (status = 200, description = "Home page data", body = HomePage),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let page = (|| -> Result<HomePage, diesel::result::Error> {
        let all_categories = categories::table
            .select(Category::as_select())
            .load(&mut conn)?;

        let featured_recipes = recipes::table
            .select(Recipe::as_select())
            .limit(FEATURED_RECIPES)
            .load(&mut conn)?;

        let latest_blogs = blogs::table
            .select(Blog::as_select())
            .order(blogs::date_posted.desc())
            .limit(LATEST_BLOGS)
            .load(&mut conn)?;

        Ok(HomePage {
            categories: all_categories,
            featured_recipes,
            latest_blogs,
        })
    })();

    match page {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => {
            tracing::error!("Failed to load home page: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to load home page".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/about",
    tag = "pages",
    responses((status = 200, description = "About page", body = StaticPage))
)]
pub async fn about() -> impl IntoResponse {
    Json(StaticPage { page: "about" })
}

// Placeholder page; the planner itself has never been built.
#[utoipa::path(
    get,
    path = "/meal_planner",
    tag = "pages",
    responses((status = 200, description = "Meal planner placeholder", body = StaticPage))
)]
pub async fn meal_planner() -> impl IntoResponse {
    Json(StaticPage {
        page: "meal_planner",
    })
}

/// Identity probe: reports who the current session belongs to, if anyone.
#[utoipa::path(
    get,
    path = "/check",
    tag = "pages",
    responses((status = 200, description = "Current session identity", body = CheckResponse))
)]
pub async fn check(MaybePrincipal(principal): MaybePrincipal) -> impl IntoResponse {
    let response = match principal {
        Some(principal) => CheckResponse {
            authenticated: true,
            role: Some(principal.kind().as_str()),
            username: Some(principal.username().to_string()),
        },
        None => CheckResponse {
            authenticated: false,
            role: None,
            username: None,
        },
    };

    Json(response)
}
