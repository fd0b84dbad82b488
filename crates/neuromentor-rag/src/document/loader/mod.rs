use std::path::Path;

use super::{DocumentError, DocumentLoader};

mod image;
#[cfg(feature = "pdf")]
mod pdf;
mod text;

pub use image::{image_mime_type, load_image};
#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;
pub use text::TextLoader;

/// Pick a loader by file extension (case-insensitive).
///
/// # Errors
///
/// Returns [`DocumentError::UnsupportedFormat`] for extensions no enabled loader handles.
pub fn loader_for(
    path: &Path,
    max_file_size: u64,
) -> Result<Box<dyn DocumentLoader>, DocumentError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let text = TextLoader { max_file_size };
    if text.supported_extensions().contains(&ext.as_str()) {
        return Ok(Box::new(text));
    }

    #[cfg(feature = "pdf")]
    if ext == "pdf" {
        return Ok(Box::new(PdfLoader { max_file_size }));
    }

    #[cfg(not(feature = "pdf"))]
    if ext == "pdf" {
        return Err(DocumentError::UnsupportedFormat(
            "pdf (built without the `pdf` feature)".to_owned(),
        ));
    }

    Err(DocumentError::UnsupportedFormat(if ext.is_empty() {
        path.display().to_string()
    } else {
        ext
    }))
}

/// Canonicalize `path` and reject it when larger than `max_size`.
pub(super) async fn checked_path(
    path: &Path,
    max_size: u64,
) -> Result<std::path::PathBuf, DocumentError> {
    let path = tokio::fs::canonicalize(path).await?;
    let meta = tokio::fs::metadata(&path).await?;
    if meta.len() > max_size {
        return Err(DocumentError::FileTooLarge(meta.len()));
    }
    Ok(path)
}
