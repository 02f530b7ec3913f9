use super::document::SpecDocument;
use super::types::DocumentFormat;
use crate::error::{ComposeError, Result};
use std::path::Path;
use tracing::debug;

/// Read a specification document from disk
///
/// The format is chosen from the file extension (`.yaml`/`.yml` are YAML,
/// anything else is parsed as JSON). The document is not validated against
/// the OpenAPI schema; call [`SpecDocument::operations`] to check the shape
/// needed for indexing.
///
/// # Errors
///
/// * [`ComposeError::Io`] when the file cannot be read
/// * [`ComposeError::Parse`] when the content is not valid YAML/JSON
pub fn load_document(file_path: impl AsRef<Path>) -> Result<SpecDocument> {
    let file_path = file_path.as_ref();
    let content = std::fs::read_to_string(file_path).map_err(|source| ComposeError::Io {
        path: file_path.display().to_string(),
        source,
    })?;
    let format = DocumentFormat::from_path(file_path);
    debug!(path = %file_path.display(), ?format, bytes = content.len(), "loaded specification document");
    SpecDocument::parse(&content, format, &file_path.display().to_string())
}
