//! Multipart form decoding shared by the admin recipe and blog forms:
//! named text fields plus at most one optional image file.

use crate::api::ErrorResponse;
use axum::{
    extract::multipart::{Multipart, MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;

pub struct UploadedImage {
    /// Client-supplied name, kept for logging only; storage keys are
    /// generated by the image store.
    pub filename: String,
    pub data: Vec<u8>,
}

pub struct FormData {
    fields: HashMap<String, String>,
    pub image: Option<UploadedImage>,
}

pub enum FormError {
    Missing(&'static str),
    Multipart(MultipartError),
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        match self {
            FormError::Missing(name) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Missing required field: {name}"),
                }),
            )
                .into_response(),
            FormError::Multipart(e) => {
                let error = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    "File too large".to_string()
                } else {
                    format!("Failed to read form data: {}", e.body_text())
                };
                (e.status(), Json(ErrorResponse { error })).into_response()
            }
        }
    }
}

impl FormData {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, FormError> {
        let mut fields = HashMap::new();
        let mut image = None;

        while let Some(field) = multipart.next_field().await.map_err(FormError::Multipart)? {
            let name = field.name().unwrap_or_default().to_string();

            // A file part with an empty filename is a form whose file input
            // was left blank; treat it as "no upload".
            let filename = field.file_name().unwrap_or_default().to_string();
            if name == "image" {
                if !filename.is_empty() {
                    let data = field.bytes().await.map_err(FormError::Multipart)?;
                    image = Some(UploadedImage {
                        filename,
                        data: data.to_vec(),
                    });
                }
                continue;
            }

            let value = field.text().await.map_err(FormError::Multipart)?;
            fields.insert(name, value);
        }

        Ok(FormData { fields, image })
    }

    /// A required text field; absent or blank is a 400.
    pub fn required(&self, name: &'static str) -> Result<&str, FormError> {
        match self.fields.get(name).map(|v| v.trim()) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(FormError::Missing(name)),
        }
    }

    /// An optional text field; blank values collapse to None.
    pub fn optional(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}
