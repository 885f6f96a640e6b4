//! pixelops is a small toolkit for classical 2D image analysis on 8-bit
//! grayscale and RGB buffers.
//!
//! It covers geometric transforms (padding, cropping, resizing, pyramid
//! scaling, rotation), color conversion, Gaussian smoothing, Sobel and
//! hysteresis edge detection, and normalized cross-correlation template
//! matching. Every operation is a plain function from owned buffers to a new
//! owned buffer. File loading and saving live behind the `image-io` feature.

pub mod color;
pub mod edge;
pub mod filter;
pub mod geometry;
pub mod image;
pub mod matching;
mod trace;
pub mod util;

pub use crate::color::{gray_to_rgb, hue_shift, to_grayscale, to_hsv};
pub use crate::edge::{gradient_edges, multi_stage_edges, sobel, Gradient};
pub use crate::filter::{blur, gaussian_blur, gaussian_kernel};
pub use crate::geometry::{crop, manual_copy, pad, resize, rotate};
pub use crate::image::pyramid::{pyr_down, pyr_up, pyramid_scale, ImagePyramid, ScaleDirection};
pub use crate::image::{ChannelLayout, ImageInfo, ImageView, OwnedImage};
pub use crate::matching::{
    match_template, match_template_with, MatchConfig, MatchLocation, ScoreMap, TemplateMatch,
};
pub use crate::util::{PixelOpsError, PixelOpsResult};

#[cfg(feature = "image-io")]
pub use crate::image::io;
