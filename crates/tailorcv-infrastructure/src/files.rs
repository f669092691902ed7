//! File attachment loading.
//!
//! Reads a local file into an [`AttachedFile`], sniffing the MIME type from
//! the extension. Policy checks (type, size) belong to the owning workflow;
//! this only produces the candidate.

use std::path::Path;
use tailorcv_core::error::{Result, TailorCvError};
use tailorcv_core::submission::AttachedFile;

/// Reads `path` into an attachment candidate.
pub async fn load_attachment(path: &Path) -> Result<AttachedFile> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| TailorCvError::validation("Attachment path has no file name"))?;

    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    let bytes = tokio::fs::read(path).await?;

    Ok(AttachedFile {
        file_name,
        mime_type,
        bytes,
    })
}
