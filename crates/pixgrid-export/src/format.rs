//! Output format selection.

use std::fmt;
use std::path::Path;

/// Errors from choosing a format or encoding an image.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The output extension is not one of the supported formats.
    #[error("unsupported output format: {0:?} (expected .png, .jpg or .jpeg)")]
    UnsupportedFormat(String),

    /// The encoder rejected the image.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Encoded file format for a converted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossless PNG, alpha preserved.
    Png,
    /// JPEG at [`JPEG_QUALITY`](crate::JPEG_QUALITY), alpha discarded.
    Jpeg,
}

impl OutputFormat {
    /// Pick the format from a file extension (without the dot),
    /// ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::UnsupportedFormat`] for any other extension.
    pub fn from_extension(ext: &str) -> Result<Self, ExportError> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(ExportError::UnsupportedFormat(ext.to_owned())),
        }
    }

    /// Pick the format from an output path's extension.
    ///
    /// There is no fallback: a path without an extension is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::UnsupportedFormat`] if the extension is
    /// missing or not PNG/JPEG.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .ok_or_else(|| ExportError::UnsupportedFormat(String::new()))?;
        Self::from_extension(&ext.to_string_lossy())
    }

    /// MIME type for HTTP responses.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => f.write_str("PNG"),
            Self::Jpeg => f.write_str("JPEG"),
        }
    }
}
