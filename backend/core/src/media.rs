//! Local sample files: loading and MIME detection.

use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::error::{CogError, CogResult};

/// Read a local sample file, mapping I/O failures to [`CogError::LocalResource`].
pub async fn load_local_file(path: &Path) -> CogResult<Bytes> {
    match tokio::fs::read(path).await {
        Ok(data) => {
            debug!(path = %path.display(), bytes = data.len(), "Loaded local file");
            Ok(Bytes::from(data))
        }
        Err(e) => Err(CogError::LocalResource {
            path: path.to_path_buf(),
            reason: if e.kind() == std::io::ErrorKind::NotFound {
                "file doesn't exist".to_string()
            } else {
                e.to_string()
            },
        }),
    }
}

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "bmp"          => "image/bmp",
        "tiff" | "tif" => "image/tiff",

        "wav"          => "audio/wav",
        "mp3"          => "audio/mpeg",
        "ogg"          => "audio/ogg",
        "flac"         => "audio/flac",

        "pdf"          => "application/pdf",
        "txt"          => "text/plain",
        "html" | "htm" => "text/html",
        "docx"         => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "json"         => "application/json",

        _              => "application/octet-stream",
    }
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Whether a MIME type is for audio.
pub fn is_audio(mime: &str) -> bool {
    mime.starts_with("audio/")
}
