//! Rotation: lossless quarter and half turns plus arbitrary-angle resampling.

use crate::image::OwnedImage;
use crate::trace::trace_span;
use crate::util::math::{saturate_u8, sin_cos_deg};
use crate::util::PixelOpsResult;

/// Rotates by `angle_deg` degrees clockwise.
///
/// Exactly 90 and 180 take the lossless index-permutation paths (90 swaps the
/// output width and height). Every other angle goes through
/// [`rotate_bilinear`] with a zero fill, keeping the input canvas size.
pub fn rotate(image: &OwnedImage, angle_deg: i32) -> PixelOpsResult<OwnedImage> {
    let _span = trace_span!("rotate", angle_deg = angle_deg).entered();
    match angle_deg {
        90 => rotate_90_cw(image),
        180 => rotate_180(image),
        other => rotate_bilinear(image, other as f32, 0),
    }
}

/// Quarter turn clockwise; a `w x h` image becomes `h x w`.
pub fn rotate_90_cw(image: &OwnedImage) -> PixelOpsResult<OwnedImage> {
    let width = image.width();
    let height = image.height();
    let channels = image.channels();
    let src = image.data();
    let mut out = Vec::with_capacity(src.len());
    // Destination (dx, dy) takes source (dy, height - 1 - dx).
    for dy in 0..width {
        for dx in 0..height {
            let sy = height - 1 - dx;
            let idx = (sy * width + dy) * channels;
            out.extend_from_slice(&src[idx..idx + channels]);
        }
    }
    OwnedImage::new(out, height, width, image.layout())
}

/// Half turn.
pub fn rotate_180(image: &OwnedImage) -> PixelOpsResult<OwnedImage> {
    let channels = image.channels();
    let mut out = Vec::with_capacity(image.data().len());
    for pixel in image.data().chunks_exact(channels).rev() {
        out.extend_from_slice(pixel);
    }
    OwnedImage::new(out, image.width(), image.height(), image.layout())
}

/// Rotates clockwise about `(width / 2, height / 2)` with bilinear sampling.
///
/// Each destination pixel `(x, y)` is mapped back to the source through the
/// inverse rotation. Neighbours that fall outside the source contribute
/// `fill`, so exposed corners blend into the fill value. The output has the
/// same dimensions as the input; content rotated past the canvas is clipped.
pub fn rotate_bilinear(image: &OwnedImage, angle_deg: f32, fill: u8) -> PixelOpsResult<OwnedImage> {
    let width = image.width();
    let height = image.height();
    let channels = image.channels();
    let src = image.data();
    let mut out = vec![fill; src.len()];

    let (sin_a, cos_a) = sin_cos_deg(angle_deg);
    let cx = (width / 2) as f32;
    let cy = (height / 2) as f32;
    let fill_f = fill as f32;

    let sample = |x: isize, y: isize, c: usize| -> f32 {
        if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
            return fill_f;
        }
        src[(y as usize * width + x as usize) * channels + c] as f32
    };

    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let src_x = cos_a * dx + sin_a * dy + cx;
            let src_y = -sin_a * dx + cos_a * dy + cy;
            if !src_x.is_finite() || !src_y.is_finite() {
                continue;
            }
            let fx0 = src_x.floor();
            let fy0 = src_y.floor();
            if fx0 < -1.0 || fy0 < -1.0 || fx0 >= width as f32 || fy0 >= height as f32 {
                continue;
            }

            let x0 = fx0 as isize;
            let y0 = fy0 as isize;
            let fx = src_x - fx0;
            let fy = src_y - fy0;
            let w00 = (1.0 - fx) * (1.0 - fy);
            let w10 = fx * (1.0 - fy);
            let w01 = (1.0 - fx) * fy;
            let w11 = fx * fy;

            let base = (y * width + x) * channels;
            for c in 0..channels {
                let value = sample(x0, y0, c) * w00
                    + sample(x0 + 1, y0, c) * w10
                    + sample(x0, y0 + 1, c) * w01
                    + sample(x0 + 1, y0 + 1, c) * w11;
                out[base + c] = saturate_u8(value);
            }
        }
    }

    OwnedImage::new(out, width, height, image.layout())
}
