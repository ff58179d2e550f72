//! Image storage on the local filesystem.
//!
//! Files live flat in one directory under generated names
//! (`<uuid><.ext>`). Records reference them only by URL string.

use std::path::PathBuf;

use crate::error::{validation::validate_file_name, AppError, AppResult};

/// URL prefix under which stored images are served.
pub const IMAGE_URL_PREFIX: &str = "/uploads/image";

const MAX_EXTENSION_LEN: usize = 10;

/// A file accepted by [`AssetStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub filename: String,
    pub url: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
    max_file_bytes: u64,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>, max_file_bytes: u64) -> Self {
        Self { dir: dir.into(), max_file_bytes }
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// Checks an upload before anything touches the disk.
    pub fn check_upload(&self, content_type: Option<&str>, len: usize) -> AppResult<()> {
        if len == 0 {
            return Err(AppError::invalid_field("file", "File cannot be empty"));
        }
        let is_image = content_type
            .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err(AppError::invalid_field("file", "File must be an image"));
        }
        if len as u64 > self.max_file_bytes {
            return Err(AppError::invalid_field(
                "file",
                format!("File too large. Maximum is {} bytes", self.max_file_bytes),
            ));
        }
        Ok(())
    }

    /// Validates and writes an upload under a fresh collision-free name.
    pub async fn save(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        data: &[u8],
    ) -> AppResult<StoredAsset> {
        self.check_upload(content_type, data.len())?;

        tokio::fs::create_dir_all(&self.dir).await?;

        let filename = format!("{}{}", uuid::Uuid::new_v4(), extension_of(original_name));
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, data).await?;

        tracing::info!(filename = %filename, size = data.len(), "image stored");
        Ok(StoredAsset {
            url: format!("{}/{}", IMAGE_URL_PREFIX, filename),
            filename,
            size: data.len() as u64,
        })
    }

    /// Resolves a stored file, failing with `NotFound` if it does not exist.
    pub async fn locate(&self, filename: &str) -> AppResult<PathBuf> {
        validate_file_name(filename)?;
        let path = self.dir.join(filename);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(image_not_found(filename)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(image_not_found(filename)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, filename: &str) -> AppResult<()> {
        let path = self.locate(filename).await?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(filename = %filename, "image deleted");
                Ok(())
            }
            // Lost a race with a concurrent delete.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(image_not_found(filename)),
            Err(e) => Err(e.into()),
        }
    }
}

fn image_not_found(filename: &str) -> AppError {
    AppError::NotFound(format!("Image {} not found", filename))
}

/// Returns `.ext` from the original file name, or an empty string.
///
/// Only short alphanumeric extensions survive; anything else is dropped.
fn extension_of(original_name: Option<&str>) -> String {
    let Some(name) = original_name else {
        return String::new();
    };
    // Strip any client-side directory part.
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => String::new(),
    }
}
