//! Error types for formatting, resolution, rendering and export.

use thiserror::Error;

/// Result type for qrchitect operations.
pub type QrResult<T> = Result<T, QrError>;

/// Errors surfaced by the formatter, resolver, engine and session.
#[derive(Debug, Error)]
pub enum QrError {
    /// Raw content was empty. Field-level; the render is skipped until fixed.
    #[error("Content is required")]
    EmptyContent,

    /// A color string was not a `#rgb`, `#rrggbb` or `#rrggbbaa` hex value.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Gradient angle outside 0..=360 degrees.
    #[error("Gradient angle must be within 0-360 degrees, got {0}")]
    InvalidAngle(i32),

    /// Background logo decode failed. Non-fatal: rendering continues without a logo.
    #[error("Failed to decode logo: {0}")]
    LogoDecode(String),

    /// Rendering engine could not be initialized. Fatal for the preview.
    #[error("Rendering engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Payload could not be encoded as a QR matrix.
    #[error("Failed to encode QR code: {0}")]
    Encode(String),

    /// Encoding the rendered surface failed.
    #[error("Export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl QrError {
    /// Whether the error only affects a single input field.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            QrError::EmptyContent | QrError::InvalidColor(_) | QrError::InvalidAngle(_)
        )
    }
}
