use serde::Serialize;

use crate::DomainError;

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Encoded in-memory image: a `data:<mime>;base64,<payload>` url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    data_url: String,
}

impl ImageSource {
    pub fn from_data_url(data_url: impl Into<String>) -> Result<Self, DomainError> {
        let data_url = data_url.into();
        let Some(rest) = data_url.strip_prefix(DATA_URL_PREFIX) else {
            return Err(DomainError::InvalidDataUrl);
        };
        if !rest.contains(BASE64_MARKER) {
            return Err(DomainError::InvalidDataUrl);
        }
        Ok(Self { data_url })
    }

    pub fn from_base64(media_type: &str, payload: &str) -> Self {
        Self {
            data_url: format!("{DATA_URL_PREFIX}{media_type}{BASE64_MARKER}{payload}"),
        }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn media_type(&self) -> &str {
        self.data_url[DATA_URL_PREFIX.len()..]
            .split_once(BASE64_MARKER)
            .map(|(media_type, _)| media_type)
            .unwrap_or_default()
    }

    pub fn payload(&self) -> &str {
        self.data_url
            .split_once(BASE64_MARKER)
            .map(|(_, payload)| payload)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// A decoded source image at natural resolution, RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions {
            width: self.width,
            height: self.height,
        }
    }
}

/// Output of the compositor, RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSurface {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Media type for a handful of common image extensions.
pub fn media_type_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
