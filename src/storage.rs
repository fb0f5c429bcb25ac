use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader};
use uuid::Uuid;

pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

#[derive(Debug)]
pub enum StorageError {
    TooLarge,
    UnknownFormat,
    UnsupportedFormat(ImageFormat),
    Io(std::io::Error),
}

impl StorageError {
    /// True for errors the client caused (400), false for server faults (500).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, StorageError::Io(_))
    }

    pub fn user_message(&self) -> String {
        match self {
            StorageError::TooLarge => {
                format!("File too large. Maximum size is {} bytes", MAX_FILE_SIZE)
            }
            StorageError::UnknownFormat => "Could not detect image format".to_string(),
            StorageError::UnsupportedFormat(format) => format!(
                "Unsupported image format: {:?}. Allowed: JPEG, PNG, GIF, WebP",
                format
            ),
            StorageError::Io(_) => "Failed to store image".to_string(),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// On-disk image storage. Files are keyed by a generated UUID plus an
/// extension sniffed from the bytes; client-supplied filenames never touch
/// the filesystem, so concurrent uploads cannot collide or overwrite.
#[derive(Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ImageStore { dir: dir.into() }
    }

    pub async fn init(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validates the upload and writes it under a fresh storage key.
    /// Returns the key to store in the owning row's `image` column.
    pub async fn save(&self, data: &[u8]) -> Result<String, StorageError> {
        if data.len() > MAX_FILE_SIZE {
            return Err(StorageError::TooLarge);
        }

        let ext = detect_extension(data)?;
        let key = format!("{}.{}", Uuid::new_v4(), ext);
        tokio::fs::write(self.dir.join(&key), data).await?;

        Ok(key)
    }

    /// Best-effort removal, for rolling back an upload after a failed
    /// database write or dropping a replaced image.
    pub async fn remove(&self, key: &str) {
        if let Err(e) = tokio::fs::remove_file(self.dir.join(key)).await {
            tracing::warn!(key, error = %e, "Failed to remove stored image");
        }
    }
}

/// Detect the image format from magic bytes and map it to a file extension.
fn detect_extension(data: &[u8]) -> Result<&'static str, StorageError> {
    let format = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(StorageError::Io)?
        .format()
        .ok_or(StorageError::UnknownFormat)?;

    match format {
        ImageFormat::Jpeg => Ok("jpg"),
        ImageFormat::Png => Ok("png"),
        ImageFormat::Gif => Ok("gif"),
        ImageFormat::WebP => Ok("webp"),
        other => Err(StorageError::UnsupportedFormat(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn detects_png() {
        assert_eq!(detect_extension(PNG_HEADER).unwrap(), "png");
    }

    #[test]
    fn detects_jpeg() {
        assert_eq!(detect_extension(JPEG_HEADER).unwrap(), "jpg");
    }

    #[test]
    fn detects_gif() {
        assert_eq!(detect_extension(b"GIF89a").unwrap(), "gif");
    }

    #[test]
    fn rejects_non_image_bytes() {
        assert!(matches!(
            detect_extension(b"<html>not an image</html>"),
            Err(StorageError::UnknownFormat)
        ));
    }

    #[tokio::test]
    async fn save_generates_distinct_keys() {
        let store = ImageStore::new(
            std::env::temp_dir().join(format!("sufuria-store-test-{}", Uuid::new_v4())),
        );
        store.init().await.unwrap();

        let a = store.save(PNG_HEADER).await.unwrap();
        let b = store.save(PNG_HEADER).await.unwrap();

        assert_ne!(a, b, "identical uploads must not share a storage key");
        assert!(a.ends_with(".png"));
        assert!(store.dir().join(&a).exists());
        assert!(store.dir().join(&b).exists());

        store.remove(&a).await;
        assert!(!store.dir().join(&a).exists());
    }

    #[tokio::test]
    async fn save_rejects_oversized_upload() {
        let store = ImageStore::new(
            std::env::temp_dir().join(format!("sufuria-store-test-{}", Uuid::new_v4())),
        );
        store.init().await.unwrap();

        let mut data = PNG_HEADER.to_vec();
        data.resize(MAX_FILE_SIZE + 1, 0);
        assert!(matches!(
            store.save(&data).await,
            Err(StorageError::TooLarge)
        ));
    }
}
