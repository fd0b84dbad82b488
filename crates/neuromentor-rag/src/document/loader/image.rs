use std::path::Path;

use neuromentor_llm::ImageData;

use super::checked_path;
use crate::document::DocumentError;

/// MIME type for the image extensions accepted as uploads.
#[must_use]
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => Some("image/jpeg"),
        Some("png") => Some("image/png"),
        _ => None,
    }
}

/// Read a jpg/jpeg/png upload into memory for a vision model.
///
/// # Errors
///
/// Returns [`DocumentError::UnsupportedFormat`] for other extensions,
/// [`DocumentError::FileTooLarge`] above `max_size`, and IO errors otherwise.
pub async fn load_image(path: &Path, max_size: u64) -> Result<ImageData, DocumentError> {
    let mime_type = image_mime_type(path)
        .ok_or_else(|| DocumentError::UnsupportedFormat(path.display().to_string()))?;
    let path = checked_path(path, max_size).await?;
    let data = tokio::fs::read(&path).await?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "image loaded");
    Ok(ImageData {
        data,
        mime_type: mime_type.to_owned(),
    })
}
