//! Chart image encoding for inline model payloads

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::path::Path;

use crate::error::AnalysisError;
use crate::services::gemini::Part;

pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Image content ready to be embedded in a JSON request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub file_name: String,
    pub mime_type: String,
    /// Base64 text, without any `data:` prefix
    pub data: String,
}

impl EncodedImage {
    pub fn to_part(&self) -> Part {
        Part::inline_data(self.mime_type.clone(), self.data.clone())
    }
}

/// Guess the media type from a file extension
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

fn resolve_mime(declared: Option<&str>, file_name: &str) -> String {
    declared
        .map(str::trim)
        .filter(|mime| !mime.is_empty())
        .map(str::to_string)
        .or_else(|| mime_for_path(Path::new(file_name)).map(str::to_string))
        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string())
}

/// Encode bytes already in memory. No size or format checks are made here.
pub fn encode_bytes(bytes: &[u8], declared_mime: Option<&str>, file_name: &str) -> EncodedImage {
    EncodedImage {
        file_name: file_name.to_string(),
        mime_type: resolve_mime(declared_mime, file_name),
        data: BASE64.encode(bytes),
    }
}

/// Read a file and encode it. An unreadable file is an image-read error.
pub async fn encode_file(path: impl AsRef<Path>) -> Result<EncodedImage, AnalysisError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(encode_bytes(&bytes, None, &file_name))
}

/// Accept either a `data:<mime>;base64,<payload>` URL or bare base64 text,
/// keeping only the payload.
pub fn from_data_url(file_name: &str, raw: &str) -> Result<EncodedImage, AnalysisError> {
    let trimmed = raw.trim();
    let (declared_mime, payload) = match trimmed.strip_prefix("data:") {
        Some(rest) => {
            let (meta, payload) = rest.split_once(',').ok_or_else(|| {
                AnalysisError::ImageRead {
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "data URL is missing its payload separator",
                    ),
                }
            })?;
            let mime = meta.split(';').next().filter(|m| !m.is_empty());
            (mime, payload)
        }
        None => (None, trimmed),
    };

    BASE64.decode(payload.as_bytes()).map_err(|e| AnalysisError::ImageRead {
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
    })?;

    Ok(EncodedImage {
        file_name: file_name.to_string(),
        mime_type: resolve_mime(declared_mime, file_name),
        data: payload.to_string(),
    })
}
