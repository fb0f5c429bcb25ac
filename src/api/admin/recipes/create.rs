use crate::api::forms::{FormData, FormError};
use crate::api::ErrorResponse;
use crate::context::AppState;
use crate::get_conn;
use crate::models::{Category, NewRecipe};
use crate::schema::{categories, recipes};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: i32,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct RecipeFormRequest {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub category_id: i32,
    pub cuisine: Option<String>,
    pub diet_type: Option<String>,
    pub prep_time: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

/// The add-recipe form needs the category list.
#[utoipa::path(
    get,
    path = "/admin/add_recipe",
    tag = "admin",
    responses(
        (status = 200, description = "Categories for the recipe form", body = [Category]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn add_recipe_page(State(state): State<AppState>) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    match categories::table
        .select(Category::as_select())
        .load(&mut conn)
    {
        Ok(all) => (StatusCode::OK, Json(all)).into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch categories: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch categories".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/admin/add_recipe",
    tag = "admin",
    request_body(content_type = "multipart/form-data", content = RecipeFormRequest),
    responses(
        (status = 201, description = "Recipe created", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn add_recipe(State(state): State<AppState>, multipart: Multipart) -> impl IntoResponse {
    let form = match FormData::from_multipart(multipart).await {
        Ok(f) => f,
        Err(e) => return e.into_response(),
    };

    let required: Result<_, FormError> = (|| {
        Ok((
            form.required("title")?,
            form.required("description")?,
            form.required("ingredients")?,
            form.required("instructions")?,
            form.required("category_id")?,
        ))
    })();
    let (title, description, ingredients, instructions, category_id) = match required {
        Ok(fields) => fields,
        Err(e) => return e.into_response(),
    };

    let category_id: i32 = match category_id.parse() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "category_id must be an integer".to_string(),
                }),
            )
                .into_response()
        }
    };

    let mut conn = get_conn!(state.pool);

    let category_exists: Option<i32> = match categories::table
        .find(category_id)
        .select(categories::id)
        .first(&mut conn)
        .optional()
    {
        Ok(found) => found,
        Err(e) => {
            tracing::error!("Failed to look up category: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response();
        }
    };
    if category_exists.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Unknown category".to_string(),
            }),
        )
            .into_response();
    }

    // Store the image before the row so the row never points at a missing
    // file; roll the file back if the insert fails.
    let image_key = match &form.image {
        Some(upload) => match state.images.save(&upload.data).await {
            Ok(key) => Some(key),
            Err(e) if e.is_client_error() => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: e.user_message(),
                    }),
                )
                    .into_response()
            }
            Err(e) => {
                tracing::error!(filename = %upload.filename, "Failed to store image: {}", e.user_message());
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to store image".to_string(),
                    }),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let new_recipe = NewRecipe {
        title,
        description,
        ingredients,
        instructions,
        cuisine: form.optional("cuisine"),
        diet_type: form.optional("diet_type"),
        prep_time: form.optional("prep_time"),
        image: image_key.as_deref(),
        category_id,
    };

    match diesel::insert_into(recipes::table)
        .values(&new_recipe)
        .returning(recipes::id)
        .get_result::<i32>(&mut conn)
    {
        Ok(id) => (StatusCode::CREATED, Json(CreateRecipeResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to create recipe: {}", e);
            if let Some(key) = &image_key {
                state.images.remove(key).await;
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
