use crate::api::public::pages::StaticPage;
use crate::api::ErrorResponse;
use crate::auth::{create_session, session_cookie, verify_password, PrincipalKind};
use crate::context::AppState;
use crate::get_conn;
use crate::models::Admin;
use crate::schema::admins;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Form, Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;

use super::super::public::auth::login::LoginResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[utoipa::path(
    get,
    path = "/admin/login",
    tag = "admin",
    responses((status = 200, description = "Admin login page", body = StaticPage))
)]
pub async fn login_page() -> impl IntoResponse {
    Json(StaticPage {
        page: "admin_login",
    })
}

/// Admin login by username + password; same session mechanism as users,
/// different identity space.
#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "admin",
    request_body(content = AdminLoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Form(req): Form<AdminLoginRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let admin: Admin = match admins::table
        .filter(admins::username.eq(req.username.trim()))
        .select(Admin::as_select())
        .first(&mut conn)
    {
        Ok(a) => a,
        Err(_) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid username or password".to_string(),
                }),
            )
                .into_response()
        }
    };

    if !verify_password(&req.password, &admin.password_hash) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Invalid username or password".to_string(),
            }),
        )
            .into_response();
    }

    let token = match create_session(&mut conn, PrincipalKind::Admin, admin.id) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Failed to create admin session: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create session".to_string(),
                }),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(LoginResponse {
            token,
            message: "Logged in successfully!".to_string(),
        }),
    )
        .into_response()
}
