pub mod list;
pub mod save;

use crate::context::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Per-user saved recipes; both routes require a user session via the
/// AuthUser extractor.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/save_recipe/{id}", post(save::save_recipe))
        .route("/saved_recipes", get(list::saved_recipes))
}

#[derive(OpenApi)]
#[openapi(paths(save::save_recipe, list::saved_recipes))]
pub struct ApiDoc;
