use crate::api::forms::{FormData, FormError};
use crate::api::{ErrorResponse, MessageResponse};
use crate::context::AppState;
use crate::get_conn;
use crate::models::{Category, NewRecipe, Recipe};
use crate::schema::{categories, recipes};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct EditRecipePage {
    pub recipe: Recipe,
    pub categories: Vec<Category>,
}

#[utoipa::path(
    get,
    path = "/admin/edit_recipe/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe and categories for the edit form", body = EditRecipePage),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn edit_recipe_page(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let recipe: Recipe = match recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(&mut conn)
    {
        Ok(r) => r,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Recipe not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    match categories::table
        .select(Category::as_select())
        .load(&mut conn)
    {
        Ok(all) => (
            StatusCode::OK,
            Json(EditRecipePage {
                recipe,
                categories: all,
            }),
        )
            .into_response(),
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

/// Full field replacement. The stored image is only replaced when the form
/// carries a new file; the old file is dropped afterwards.
#[utoipa::path(
    post,
    path = "/admin/edit_recipe/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Recipe ID")),
    request_body(content_type = "multipart/form-data", content = super::create::RecipeFormRequest),
    responses(
        (status = 200, description = "Recipe updated", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = []))
)]
pub async fn edit_recipe(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> impl IntoResponse {
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

    let existing: Recipe = match recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(&mut conn)
    {
        Ok(r) => r,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Recipe not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

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
                    error: "Failed to update recipe".to_string(),
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

    let new_image_key = match &form.image {
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

    let image = new_image_key.as_deref().or(existing.image.as_deref());

    let changes = NewRecipe {
        title,
        description,
        ingredients,
        instructions,
        cuisine: form.optional("cuisine"),
        diet_type: form.optional("diet_type"),
        prep_time: form.optional("prep_time"),
        image,
        category_id,
    };

    match diesel::update(recipes::table.find(id))
        .set(&changes)
        .execute(&mut conn)
    {
        Ok(_) => {
            // The replaced file is unreferenced now.
            if new_image_key.is_some() {
                if let Some(old) = &existing.image {
                    state.images.remove(old).await;
                }
            }
            (
                StatusCode::OK,
                Json(MessageResponse {
                    message: "Recipe updated successfully!".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to update recipe: {}", e);
            if let Some(key) = &new_image_key {
                state.images.remove(key).await;
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
