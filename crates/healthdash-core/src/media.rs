//! Image files to embeddable `data:` URLs.
//!
//! Used for avatars, the source image of an edit, and a video start frame.
//! Only common image types are accepted and files above the configured size
//! limit are rejected before they are read.

use std::fmt;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::ai::InlineImage;
use crate::error::{CoreError, ValidationError};

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// MIME type for an accepted image extension.
pub fn image_mime_for(path: &Path) -> Result<&'static str, ValidationError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        _ => Err(ValidationError::UnsupportedMediaType { extension: ext }),
    }
}

/// `data:<mime>;base64,<payload>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUrl {
    mime_type: String,
    payload: String,
}

impl DataUrl {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload: STANDARD.encode(bytes),
        }
    }

    pub fn from_base64(mime_type: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload: payload.into(),
        }
    }

    /// Read and encode an image file, enforcing type and size limits.
    pub fn from_file(path: &Path, max_bytes: u64) -> Result<Self, CoreError> {
        let mime = image_mime_for(path)?;
        let size = std::fs::metadata(path)?.len();
        if size > max_bytes {
            return Err(ValidationError::FileTooLarge {
                size,
                limit: max_bytes,
            }
            .into());
        }
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(mime, &bytes))
    }

    pub fn parse(url: &str) -> Result<Self, ValidationError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| ValidationError::MalformedDataUrl("missing 'data:' prefix".into()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| ValidationError::MalformedDataUrl("missing ',' separator".into()))?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or_else(|| ValidationError::MalformedDataUrl("only base64 payloads are supported".into()))?;
        if mime.is_empty() {
            return Err(ValidationError::MalformedDataUrl("empty MIME type".into()));
        }
        Ok(Self::from_base64(mime, payload))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload without the prefix.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn decode(&self) -> Result<Vec<u8>, ValidationError> {
        STANDARD
            .decode(&self.payload)
            .map_err(|e| ValidationError::MalformedDataUrl(e.to_string()))
    }

    pub fn to_inline_image(&self) -> InlineImage {
        InlineImage {
            mime_type: self.mime_type.clone(),
            data: self.payload.clone(),
        }
    }
}

impl From<InlineImage> for DataUrl {
    fn from(image: InlineImage) -> Self {
        Self::from_base64(image.mime_type, image.data)
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.payload)
    }
}

impl TryFrom<String> for DataUrl {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DataUrl> for String {
    fn from(url: DataUrl) -> Self {
        url.to_string()
    }
}
