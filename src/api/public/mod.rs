pub mod auth;
pub mod comments;
pub mod pages;

use crate::context::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for the public site endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/meal_planner", get(pages::meal_planner))
        .route("/check", get(pages::check))
        .route("/submit_comment", post(comments::submit_comment))
        .route(
            "/register",
            get(auth::register::register_page).post(auth::register::register),
        )
        .route("/login", get(auth::login::login_page).post(auth::login::login))
        .route("/logout", get(auth::logout::logout))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        pages::home,
        pages::about,
        pages::meal_planner,
        pages::check,
        comments::submit_comment,
        auth::register::register_page,
        auth::register::register,
        auth::login::login_page,
        auth::login::login,
        auth::logout::logout,
    ),
    components(schemas(
        pages::HomePage,
        pages::StaticPage,
        pages::CheckResponse,
        comments::SubmitCommentRequest,
        auth::register::RegisterRequest,
        auth::login::LoginRequest,
        auth::login::LoginResponse,
    ))
)]
pub struct ApiDoc;
