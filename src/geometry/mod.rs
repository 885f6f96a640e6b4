//! Geometric transforms: padding, cropping, resizing, copying, rotation.
//!
//! Every transform reads an [`OwnedImage`] without mutating it and returns a
//! freshly allocated result, except [`manual_copy`] which fills a caller
//! supplied destination of identical shape.

use crate::image::border::Border;
use crate::image::OwnedImage;
use crate::trace::trace_span;
use crate::util::math::saturate_u8;
use crate::util::{PixelOpsError, PixelOpsResult};

pub mod rotate;

pub use rotate::{rotate, rotate_180, rotate_90_cw, rotate_bilinear};

/// Surrounds the image with a mirrored border `border` pixels wide.
///
/// The border mirrors the image including its edge pixel
/// (`cba|abcd|dcb`). Borders wider than the image keep mirroring
/// periodically.
pub fn pad(image: &OwnedImage, border: usize) -> PixelOpsResult<OwnedImage> {
    let _span = trace_span!("pad", border = border).entered();
    let width = image.width();
    let height = image.height();
    let channels = image.channels();
    let invalid = PixelOpsError::InvalidDimensions { width, height };
    let out_width = border
        .checked_mul(2)
        .and_then(|b| b.checked_add(width))
        .ok_or_else(|| invalid.clone())?;
    let out_height = border
        .checked_mul(2)
        .and_then(|b| b.checked_add(height))
        .ok_or(invalid)?;

    let src = image.data();
    let mut out = Vec::with_capacity(out_width * out_height * channels);
    for y in 0..out_height {
        let sy = Border::Reflect.map(y as isize - border as isize, height);
        for x in 0..out_width {
            let sx = Border::Reflect.map(x as isize - border as isize, width);
            let idx = (sy * width + sx) * channels;
            out.extend_from_slice(&src[idx..idx + channels]);
        }
    }
    OwnedImage::new(out, out_width, out_height, image.layout())
}

/// Cuts margins off each side of the image.
///
/// Keeps columns `x0..width - x1` and rows `y0..height - y1`. Margins that
/// leave no pixels are rejected with `InvalidArgument`.
pub fn crop(
    image: &OwnedImage,
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
) -> PixelOpsResult<OwnedImage> {
    let _span = trace_span!("crop", x0 = x0, x1 = x1, y0 = y0, y1 = y1).entered();
    let width = image.width();
    let height = image.height();
    let out_width = width
        .checked_sub(x0)
        .and_then(|w| w.checked_sub(x1))
        .filter(|&w| w > 0)
        .ok_or_else(|| {
            PixelOpsError::invalid_argument(
                "crop",
                format!("horizontal margins {x0} + {x1} leave no columns of {width}"),
            )
        })?;
    let out_height = height
        .checked_sub(y0)
        .and_then(|h| h.checked_sub(y1))
        .filter(|&h| h > 0)
        .ok_or_else(|| {
            PixelOpsError::invalid_argument(
                "crop",
                format!("vertical margins {y0} + {y1} leave no rows of {height}"),
            )
        })?;

    let roi = image.view().roi(x0, y0, out_width, out_height)?;
    OwnedImage::from_view(roi)
}

/// Resamples to exactly `target_width x target_height` with bilinear weights.
///
/// Pixel centres are aligned (`src = (dst + 0.5) * scale - 0.5`) and source
/// coordinates are clamped to the image, so the aspect ratio is not kept.
pub fn resize(
    image: &OwnedImage,
    target_width: usize,
    target_height: usize,
) -> PixelOpsResult<OwnedImage> {
    let _span = trace_span!("resize", width = target_width, height = target_height).entered();
    if target_width == 0 || target_height == 0 {
        return Err(PixelOpsError::invalid_argument(
            "resize",
            format!("target size {target_width}x{target_height} must be positive"),
        ));
    }

    let width = image.width();
    let height = image.height();
    let channels = image.channels();
    let src = image.data();
    let scale_x = width as f32 / target_width as f32;
    let scale_y = height as f32 / target_height as f32;

    let x_taps: Vec<(usize, usize, f32)> = (0..target_width)
        .map(|x| linear_tap(x, scale_x, width))
        .collect();

    let mut out = Vec::with_capacity(target_width * target_height * channels);
    for y in 0..target_height {
        let (y0, y1, fy) = linear_tap(y, scale_y, height);
        let row0 = &src[y0 * width * channels..(y0 + 1) * width * channels];
        let row1 = &src[y1 * width * channels..(y1 + 1) * width * channels];
        for &(x0, x1, fx) in &x_taps {
            for c in 0..channels {
                let a = row0[x0 * channels + c] as f32;
                let b = row0[x1 * channels + c] as f32;
                let d = row1[x0 * channels + c] as f32;
                let e = row1[x1 * channels + c] as f32;
                let top = a + (b - a) * fx;
                let bottom = d + (e - d) * fx;
                out.push(saturate_u8(top + (bottom - top) * fy));
            }
        }
    }
    OwnedImage::new(out, target_width, target_height, image.layout())
}

fn linear_tap(dst: usize, scale: f32, len: usize) -> (usize, usize, f32) {
    let pos = ((dst as f32 + 0.5) * scale - 0.5).max(0.0);
    let lo = (pos.floor() as usize).min(len - 1);
    let hi = (lo + 1).min(len - 1);
    let frac = if hi == lo { 0.0 } else { pos - lo as f32 };
    (lo, hi, frac)
}

/// Copies `src` into `dst` one element at a time in row-major order.
///
/// `dst` must already have the same width, height, and layout as `src`.
pub fn manual_copy(src: &OwnedImage, dst: &mut OwnedImage) -> PixelOpsResult<()> {
    let _span = trace_span!("manual_copy").entered();
    if !src.same_shape(dst) {
        return Err(PixelOpsError::ShapeMismatch {
            op: "manual_copy",
            expected: src.shape_label(),
            got: dst.shape_label(),
        });
    }
    for y in 0..src.height() {
        for x in 0..src.width() {
            for c in 0..src.channels() {
                if let Some(value) = src.get(x, y, c) {
                    dst.set(x, y, c, value);
                }
            }
        }
    }
    Ok(())
}
