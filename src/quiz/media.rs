//! Media handling for questions
//!
//! Questions may carry an image. The engine treats an image as an opaque
//! displayable reference: either an asset reference shipped with the show
//! or a self-contained `data:` URI produced from an uploaded file, so that
//! exported quizzes have no external asset dependencies.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::media::SVG_MIME;

/// A displayable image reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct Image(String);

/// Errors that can occur while encoding an uploaded image
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The payload contained no bytes
    #[error("image payload is empty")]
    Empty,
    /// The payload is not an image format the show can display
    #[error("unsupported image format")]
    UnsupportedFormat,
}

impl Image {
    /// Wraps an existing reference such as an asset path or data URI
    pub fn from_reference(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Encodes raw image bytes as a `data:` URI
    ///
    /// The mime type is detected from the payload's signature.
    ///
    /// # Errors
    ///
    /// * `Error::Empty` - `bytes` is empty
    /// * `Error::UnsupportedFormat` - the signature is not a known image type
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.is_empty() {
            return Err(Error::Empty);
        }
        let mime = sniff_mime(bytes).ok_or(Error::UnsupportedFormat)?;
        Ok(Self(format!("data:{mime};base64,{}", STANDARD.encode(bytes))))
    }

    /// Returns the reference as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this image is embedded rather than referencing an asset
    pub fn is_embedded(&self) -> bool {
        self.0.starts_with("data:")
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', _, _, _, _, 0, 0, 0, 0, ..] => Some("image/bmp"),
        [0x00, 0x00, 0x01, 0x00, ..] => Some("image/x-icon"),
        [b'I', b'I', b'*', 0x00, ..] | [b'M', b'M', 0x00, b'*', ..] => Some("image/tiff"),
        [_, _, _, _, b'f', b't', b'y', b'p', brand @ ..] => iso_media_mime(brand),
        _ if looks_like_svg(bytes) => Some(SVG_MIME),
        _ => None,
    }
}

/// Maps the major brand of an ISO base media `ftyp` box to an image type
fn iso_media_mime(brand: &[u8]) -> Option<&'static str> {
    match brand.get(..4)? {
        b"avif" | b"avis" => Some("image/avif"),
        b"heic" | b"heix" | b"hevc" | b"hevx" => Some("image/heic"),
        b"mif1" | b"msf1" => Some("image/heif"),
        _ => None,
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}
