use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use log::{info, warn};
use uuid::Uuid;

use crate::utils::error::CustomError;

/// Represents a file received from a multipart form
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

impl FileUpload {
    pub fn new(file_name: String, data: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            file_name,
            data,
            content_type,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }
}

/// File validation configuration
#[derive(Debug, Clone)]
pub struct FileValidator {
    pub allowed_extensions: Vec<String>,
    pub allowed_mime_types: Vec<String>,
    pub max_file_size: usize,
}

impl FileValidator {
    /// Post images: png, jpg and jpeg up to 10MB
    pub fn images() -> Self {
        Self {
            allowed_extensions: vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()],
            allowed_mime_types: vec![
                "image/png".to_string(),
                "image/jpg".to_string(),
                "image/jpeg".to_string(),
            ],
            max_file_size: 10 * 1024 * 1024,
        }
    }

    pub fn validate(&self, file: &FileUpload) -> Result<(), CustomError> {
        if file.data.is_empty() {
            return Err(CustomError::BadRequestError("File is empty".to_string()));
        }

        let extension = file
            .extension()
            .ok_or_else(|| CustomError::BadRequestError("File has no extension".to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(CustomError::BadRequestError(format!(
                "Invalid file type '{}'. Allowed types: {}",
                extension,
                self.allowed_extensions.join(", ")
            )));
        }

        if let Some(content_type) = &file.content_type {
            if !self.allowed_mime_types.contains(&content_type.to_lowercase()) {
                return Err(CustomError::BadRequestError(format!(
                    "Invalid content type '{}'",
                    content_type
                )));
            }
        }

        if file.size() > self.max_file_size {
            return Err(CustomError::BadRequestError(format!(
                "File too large. Maximum size: {} bytes, file size: {} bytes",
                self.max_file_size,
                file.size()
            )));
        }

        Ok(())
    }
}

/// Local directory holding post images. Stored paths look like
/// `images/<userId>/<uuid>-<name>` and are resolved against `root`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    folder: String,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, folder: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            folder: folder.into(),
        }
    }

    /// Writes the upload into the owner's folder and returns its stored path.
    pub async fn save(&self, owner: &str, file: &FileUpload) -> Result<String, CustomError> {
        if !is_single_component(owner) {
            return Err(CustomError::BadRequestError(format!(
                "Invalid image owner '{}'",
                owner
            )));
        }

        let dir = self.root.join(&self.folder).join(owner);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            CustomError::InternalServerError(format!("Unable to create image directory: {}", e))
        })?;

        let file_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(&file.file_name));
        tokio::fs::write(dir.join(&file_name), &file.data)
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Unable to store file: {}", e)))?;

        let stored = format!("{}/{}/{}", self.folder, owner, file_name);
        info!("Stored image {}", stored);
        Ok(stored)
    }

    /// Removes one of the owner's images. Missing files and paths outside the
    /// owner's folder are ignored.
    pub async fn clear_image(&self, owner: &str, image_url: &str) {
        let Some(path) = self.resolve(owner, image_url) else {
            warn!(
                "Refusing to clear image outside of {}/{}: {}",
                self.folder, owner, image_url
            );
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => info!("Cleared image {}", image_url),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Image {} was already gone", image_url)
            }
            Err(e) => warn!("Unable to clear image {}: {}", image_url, e),
        }
    }

    fn resolve(&self, owner: &str, image_url: &str) -> Option<PathBuf> {
        let relative = Path::new(image_url.trim_start_matches('/'));
        let mut components = relative.components();

        match components.next() {
            Some(Component::Normal(first)) if first == self.folder.as_str() => {}
            _ => return None,
        }
        match components.next() {
            Some(Component::Normal(second)) if second == owner => {}
            _ => return None,
        }

        let rest: Vec<Component> = components.collect();
        if rest.is_empty() || !rest.iter().all(|c| matches!(c, Component::Normal(_))) {
            return None;
        }

        Some(self.root.join(relative))
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image");

    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
