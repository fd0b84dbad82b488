//! Uploaded document loading and merging.

pub mod error;
pub mod loader;
pub mod types;

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

pub use error::DocumentError;
#[cfg(feature = "pdf")]
pub use loader::PdfLoader;
pub use loader::{TextLoader, image_mime_type, load_image, loader_for};
pub use types::{Document, DocumentMetadata};

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Separator placed between documents when several uploads are merged.
pub const MERGE_SEPARATOR: &str = "\n\n";

pub type LoadFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Document>, DocumentError>> + Send + 'a>>;

pub trait DocumentLoader: Send + Sync {
    fn load(&self, path: &Path) -> LoadFuture<'_>;

    fn supported_extensions(&self) -> &[&str];
}

/// Load every path with the loader matching its extension, preserving order.
///
/// # Errors
///
/// Fails on the first path that is missing, too large, or of an unsupported format.
pub async fn load_documents(
    paths: &[impl AsRef<Path>],
    max_file_size: u64,
) -> Result<Vec<Document>, DocumentError> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let loader = loader_for(path, max_file_size)?;
        let loaded = loader.load(path).await?;
        tracing::debug!(path = %path.display(), parts = loaded.len(), "document loaded");
        documents.extend(loaded);
    }
    Ok(documents)
}

/// Join document contents into one text, separated by a blank line.
#[must_use]
pub fn merge_texts(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join(MERGE_SEPARATOR)
}
