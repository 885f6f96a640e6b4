//! Separable linear filtering and Gaussian smoothing.
//!
//! Filters are applied as correlations (the kernel is not flipped) on every
//! channel independently, accumulating in `f32`. Output buffers keep the input
//! layout and dimensions; samples outside the image are extrapolated with a
//! [`Border`] scheme.

use crate::image::border::Border;
use crate::image::{ImageView, OwnedImage};
use crate::trace::trace_span;
use crate::util::math::saturate_u8;
use crate::util::{PixelOpsError, PixelOpsResult};

/// Kernel size used by [`blur`].
pub const BLUR_KSIZE: usize = 15;

/// Builds a normalized 1D Gaussian kernel of odd length `ksize`.
///
/// Sigma is derived from the size as `0.3 * ((ksize - 1) / 2 - 1) + 0.8`.
/// Sizes up to 7 use the classical fixed binomial-like tables so small
/// smoothing passes stay integer friendly.
pub fn gaussian_kernel(ksize: usize) -> PixelOpsResult<Vec<f32>> {
    if ksize == 0 || ksize % 2 == 0 {
        return Err(PixelOpsError::invalid_argument(
            "gaussian_kernel",
            format!("kernel size must be odd and positive, got {ksize}"),
        ));
    }
    let fixed: Option<&[f32]> = match ksize {
        1 => Some(&[1.0]),
        3 => Some(&[0.25, 0.5, 0.25]),
        5 => Some(&[0.0625, 0.25, 0.375, 0.25, 0.0625]),
        7 => Some(&[
            0.031_25, 0.109_375, 0.218_75, 0.281_25, 0.218_75, 0.109_375, 0.031_25,
        ]),
        _ => None,
    };
    if let Some(table) = fixed {
        return Ok(table.to_vec());
    }

    let sigma = 0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let scale = -0.5 / (sigma * sigma);
    let radius = (ksize / 2) as f64;
    let raw: Vec<f64> = (0..ksize)
        .map(|i| {
            let d = i as f64 - radius;
            (scale * d * d).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    Ok(raw.into_iter().map(|w| (w / sum) as f32).collect())
}

/// Correlates every channel with `kx` along rows and then `ky` along columns.
///
/// Both kernels must have odd length. The result is interleaved like the
/// input and contiguous (`width * channels` elements per row).
pub(crate) fn convolve_separable(
    src: ImageView<'_, u8>,
    kx: &[f32],
    ky: &[f32],
    border: Border,
) -> Vec<f32> {
    let width = src.width();
    let height = src.height();
    let channels = src.channels();
    let row_len = width * channels;
    let rx = (kx.len() / 2) as isize;
    let ry = (ky.len() / 2) as isize;

    let mut horizontal = vec![0.0f32; row_len * height];
    for y in 0..height {
        let Some(row) = src.row(y) else { continue };
        let out = &mut horizontal[y * row_len..(y + 1) * row_len];
        for x in 0..width {
            for c in 0..channels {
                let mut acc = 0.0f32;
                for (k, &w) in kx.iter().enumerate() {
                    let sx = border.map(x as isize + k as isize - rx, width);
                    acc += w * row[sx * channels + c] as f32;
                }
                out[x * channels + c] = acc;
            }
        }
    }

    let mut out = vec![0.0f32; row_len * height];
    for y in 0..height {
        let dst = &mut out[y * row_len..(y + 1) * row_len];
        for (k, &w) in ky.iter().enumerate() {
            let sy = border.map(y as isize + k as isize - ry, height);
            let src_row = &horizontal[sy * row_len..(sy + 1) * row_len];
            for (d, &s) in dst.iter_mut().zip(src_row) {
                *d += w * s;
            }
        }
    }
    out
}

/// Packs a filtered `f32` buffer back into an 8-bit image of the same shape.
pub(crate) fn to_u8_image(
    values: &[f32],
    like: ImageView<'_, u8>,
) -> PixelOpsResult<OwnedImage> {
    let data = values.iter().map(|&v| saturate_u8(v)).collect();
    OwnedImage::new(data, like.width(), like.height(), like.layout())
}

/// Smooths an image with a square `ksize x ksize` Gaussian.
///
/// Uses mirrored borders that repeat the edge pixel, the same extrapolation as
/// [`crate::geometry::pad`].
pub fn gaussian_blur(image: &OwnedImage, ksize: usize) -> PixelOpsResult<OwnedImage> {
    let _span = trace_span!("gaussian_blur", ksize = ksize).entered();
    let kernel = gaussian_kernel(ksize)?;
    let view = image.view();
    let filtered = convolve_separable(view, &kernel, &kernel, Border::Reflect);
    to_u8_image(&filtered, view)
}

/// Applies the fixed 15x15 Gaussian smoothing pass.
pub fn blur(image: &OwnedImage) -> PixelOpsResult<OwnedImage> {
    gaussian_blur(image, BLUR_KSIZE)
}

#[cfg(test)]
mod tests {
    use super::{blur, gaussian_blur, gaussian_kernel};
    use crate::image::{ChannelLayout, OwnedImage};
    use crate::util::PixelOpsError;

    #[test]
    fn kernels_are_normalized_and_symmetric() {
        for ksize in [1usize, 3, 5, 7, 9, 15] {
            let kernel = gaussian_kernel(ksize).unwrap();
            assert_eq!(kernel.len(), ksize);
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "ksize {ksize} sums to {sum}");
            for i in 0..ksize / 2 {
                assert!((kernel[i] - kernel[ksize - 1 - i]).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn even_kernel_size_is_rejected() {
        let err = gaussian_kernel(4).unwrap_err();
        assert!(matches!(
            err,
            PixelOpsError::InvalidArgument {
                op: "gaussian_kernel",
                ..
            }
        ));
    }

    #[test]
    fn blur_preserves_constant_images() {
        let img = OwnedImage::filled(9, 7, ChannelLayout::Rgb, 77).unwrap();
        let out = blur(&img).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn blur_spreads_an_impulse_symmetrically() {
        let mut img = OwnedImage::zeros(21, 21, ChannelLayout::Gray).unwrap();
        img.set(10, 10, 0, 255);
        let out = gaussian_blur(&img, 5).unwrap();
        let center = out.get(10, 10, 0).unwrap();
        assert!(center < 255 && center > 0);
        assert_eq!(out.get(9, 10, 0), out.get(11, 10, 0));
        assert_eq!(out.get(10, 9, 0), out.get(10, 11, 0));
        assert_eq!(out.get(0, 0, 0), Some(0));
    }
}
