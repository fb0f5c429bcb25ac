pub mod auth;
pub mod blogs;
pub mod categories;
pub mod comments;
pub mod dashboard;
pub mod recipes;

use crate::context::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Admin login stays outside the guarded group.
pub fn public_router() -> Router<AppState> {
    Router::new().route(
        "/admin/login",
        get(auth::login_page).post(auth::login),
    )
}

/// The admin panel. Every route here is fenced by the require_admin
/// middleware in addition to per-handler extractors.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(dashboard::dashboard))
        .route("/admin/logout", get(crate::api::public::auth::logout::logout))
        .route(
            "/admin/add_recipe",
            get(recipes::create::add_recipe_page).post(recipes::create::add_recipe),
        )
        .route("/admin/manage_recipes", get(recipes::manage::manage_recipes))
        .route(
            "/admin/edit_recipe/{id}",
            get(recipes::update::edit_recipe_page).post(recipes::update::edit_recipe),
        )
        .route(
            "/admin/delete_recipe/{id}",
            post(recipes::delete::delete_recipe).get(recipes::delete::delete_recipe),
        )
        .route(
            "/admin/add_blog",
            get(blogs::create::add_blog_page).post(blogs::create::add_blog),
        )
        .route("/admin/manage_blogs", get(blogs::manage::manage_blogs))
        .route(
            "/admin/edit_blog/{id}",
            get(blogs::update::edit_blog_page).post(blogs::update::edit_blog),
        )
        .route("/admin/delete_blog/{id}", post(blogs::delete::delete_blog))
        .route("/admin/add_category", post(categories::add_category))
        .route("/admin/comments", get(comments::list_comments))
        .route("/admin/reply_comment/{id}", post(comments::reply_comment))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login_page,
        auth::login,
        dashboard::dashboard,
        recipes::create::add_recipe_page,
        recipes::create::add_recipe,
        recipes::manage::manage_recipes,
        recipes::update::edit_recipe_page,
        recipes::update::edit_recipe,
        recipes::delete::delete_recipe,
        blogs::create::add_blog_page,
        blogs::create::add_blog,
        blogs::manage::manage_blogs,
        blogs::update::edit_blog_page,
        blogs::update::edit_blog,
        blogs::delete::delete_blog,
        categories::add_category,
        comments::list_comments,
        comments::reply_comment,
    ),
    components(schemas(
        auth::AdminLoginRequest,
        dashboard::DashboardResponse,
        recipes::create::RecipeFormRequest,
        recipes::create::CreateRecipeResponse,
        recipes::update::EditRecipePage,
        blogs::create::BlogFormRequest,
        blogs::create::CreateBlogResponse,
        categories::AddCategoryRequest,
        categories::AddCategoryResponse,
        comments::ReplyCommentRequest,
        crate::models::Comment,
    ))
)]
pub struct ApiDoc;
