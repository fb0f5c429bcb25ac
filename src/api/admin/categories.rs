use crate::api::ErrorResponse;
use crate::context::AppState;
use crate::get_conn;
use crate::models::NewCategory;
use crate::schema::categories;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Form, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCategoryRequest {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddCategoryResponse {
    pub id: i32,
}

#[utoipa::path(
    post,
    path = "/admin/add_category",
    tag = "admin",
    request_body(content = AddCategoryRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Category created", body = AddCategoryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Category already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn add_category(
    State(state): State<AppState>,
    Form(req): Form<AddCategoryRequest>,
) -> impl IntoResponse {
    let name = req.name.trim();
    if name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Category name cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(state.pool);

    match diesel::insert_into(categories::table)
        .values(&NewCategory { name })
        .returning(categories::id)
        .get_result::<i32>(&mut conn)
    {
        Ok(id) => (StatusCode::CREATED, Json(AddCategoryResponse { id })).into_response(),
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Category already exists".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create category: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create category".to_string(),
                }),
            )
                .into_response()
        }
    }
}
