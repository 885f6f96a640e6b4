//! Error types for pixelops.

use thiserror::Error;

/// Result alias for pixelops operations.
pub type PixelOpsResult<T> = std::result::Result<T, PixelOpsError>;

/// Errors that can occur when running pixelops transforms and detectors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PixelOpsError {
    /// Width or height is zero, or the element count overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is shorter than one row of pixels.
    #[error("invalid stride {stride} for row length {row_len}")]
    InvalidStride { row_len: usize, stride: usize },
    /// Backing buffer is too small (or too large) for the declared shape.
    #[error("buffer size mismatch: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Channel count is not one of the supported layouts.
    #[error("unsupported channel count: {channels}")]
    InvalidChannels { channels: usize },
    /// Requested region does not fit inside the image.
    #[error(
        "roi ({x}, {y}, {width}x{height}) out of bounds for {img_width}x{img_height} image"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// An operation parameter is outside its accepted domain.
    #[error("{op}: invalid argument: {reason}")]
    InvalidArgument { op: &'static str, reason: String },
    /// Destination buffer shape differs from the source shape.
    #[error("{op}: shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch {
        op: &'static str,
        expected: String,
        got: String,
    },
    /// Template does not fit inside the search image.
    #[error(
        "template {tpl_width}x{tpl_height} larger than image {img_width}x{img_height}"
    )]
    TemplateTooLarge {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Template has no intensity variation, so correlation is undefined.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// Image could not be read or decoded.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
    /// Image could not be encoded or written.
    #[error("image encode error: {reason}")]
    ImageEncode { reason: String },
}

impl PixelOpsError {
    pub(crate) fn invalid_argument(op: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            op,
            reason: reason.into(),
        }
    }
}
