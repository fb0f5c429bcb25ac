pub mod get;
pub mod list;

use crate::context::AppState;
use axum::routing::get as get_route;
use axum::Router;
use utoipa::OpenApi;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/blog", get_route(list::list_blogs))
        .route("/blog/{id}", get_route(get::get_blog))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_blogs, get::get_blog),
    components(schemas(crate::models::Blog))
)]
pub struct ApiDoc;
