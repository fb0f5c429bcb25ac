pub mod by_category;
pub mod get;
pub mod list;
pub mod search;

use crate::context::AppState;
use axum::routing::get as get_route;
use axum::Router;
use utoipa::OpenApi;

/// Public recipe reads. Recipe detail is deliberately unauthenticated;
/// browsing does not require an account.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipes", get_route(list::list_recipes))
        .route("/recipe/{id}", get_route(get::get_recipe))
        .route("/search_recipes", get_route(search::search_recipes))
        .route("/category/{id}", get_route(by_category::recipes_by_category))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        get::get_recipe,
        search::search_recipes,
        by_category::recipes_by_category,
    ),
    components(schemas(
        search::SearchResult,
        by_category::CategoryPage,
        crate::models::Recipe,
        crate::models::Category,
    ))
)]
pub struct ApiDoc;
