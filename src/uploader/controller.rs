use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::StreamExt;
use log::info;
use serde::Serialize;

use crate::middleware::auth::get_user_id_from_request;
use crate::utils::error::CustomError;
use crate::utils::uploads::{FileUpload, FileValidator, ImageStore};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// The `image` file part and the optional `oldPath` text part of the form.
#[derive(Debug, Default)]
struct ImageForm {
    image: Option<FileUpload>,
    old_path: Option<String>,
}

/// Upper bound for `oldPath` and any other non-file part.
const MAX_TEXT_FIELD_SIZE: usize = 1024;

async fn read_field_bytes(
    field: &mut actix_multipart::Field,
    limit: usize,
) -> Result<Vec<u8>, CustomError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| {
            CustomError::BadRequestError(format!("Error reading file chunk: {}", e))
        })?;
        if data.len() + chunk.len() > limit {
            return Err(CustomError::BadRequestError(format!(
                "Field '{}' exceeds {} bytes",
                field.name().unwrap_or(""),
                limit
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn extract_image_form(
    mut payload: Multipart,
    max_file_size: usize,
) -> Result<ImageForm, CustomError> {
    let mut form = ImageForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            CustomError::BadRequestError(format!("Error reading multipart field: {}", e))
        })?;

        let Some(content_disposition) = field.content_disposition() else {
            continue;
        };
        let field_name = content_disposition.get_name().unwrap_or("").to_string();
        let file_name = content_disposition.get_filename().map(|f| f.to_string());

        match field_name.as_str() {
            "image" => {
                let content_type = field.content_type().map(|ct| ct.to_string());
                let data = read_field_bytes(&mut field, max_file_size).await?;
                if !data.is_empty() {
                    form.image = Some(FileUpload::new(
                        file_name.unwrap_or_else(|| "image".to_string()),
                        data,
                        content_type,
                    ));
                }
            }
            "oldPath" => {
                let data = read_field_bytes(&mut field, MAX_TEXT_FIELD_SIZE).await?;
                let value = String::from_utf8_lossy(&data).trim().to_string();
                if !value.is_empty() {
                    form.old_path = Some(value);
                }
            }
            _ => {
                read_field_bytes(&mut field, MAX_TEXT_FIELD_SIZE).await?;
            }
        }
    }

    Ok(form)
}

/// Store a post image
/// PUT /post-image
pub async fn upload_post_image(
    req: HttpRequest,
    images: web::Data<ImageStore>,
    payload: Multipart,
) -> Result<HttpResponse, CustomError> {
    let user_id = get_user_id_from_request(&req).ok_or_else(CustomError::not_authenticated)?;
    let validator = FileValidator::images();
    let form = extract_image_form(payload, validator.max_file_size).await?;

    let Some(image) = form.image else {
        return Ok(HttpResponse::Ok().json(ImageUploadResponse {
            message: "No file provided!".to_string(),
            file_path: None,
        }));
    };

    validator.validate(&image)?;

    let stored = images.save(&user_id, &image).await?;
    if let Some(old_path) = form.old_path {
        images.clear_image(&user_id, &old_path).await;
    }

    info!("User {} uploaded {}", user_id, stored);
    Ok(HttpResponse::Created().json(ImageUploadResponse {
        message: "File stored.".to_string(),
        file_path: Some(stored),
    }))
}
