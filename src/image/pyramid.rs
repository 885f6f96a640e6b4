//! Gaussian image pyramids.
//!
//! Each downward step smooths with the separable 5-tap kernel
//! `[1, 4, 6, 4, 1] / 16` and keeps every second row and column, producing
//! `((w + 1) / 2, (h + 1) / 2)`. Each upward step doubles both dimensions by
//! inserting zero rows and columns and smoothing with the same kernel scaled
//! by four so brightness is preserved. Borders mirror without repeating the
//! edge pixel.

use std::fmt;
use std::str::FromStr;

use crate::filter::convolve_separable;
use crate::image::border::Border;
use crate::image::{ImageView, OwnedImage};
use crate::trace::{trace_event, trace_span};
use crate::util::math::saturate_u8;
use crate::util::{PixelOpsError, PixelOpsResult};

const PYR_KERNEL: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];
const PYR_UP_KERNEL: [f32; 5] = [0.125, 0.5, 0.75, 0.5, 0.125];

/// Direction of a pyramid resampling pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScaleDirection {
    /// Double the resolution.
    Up,
    /// Halve the resolution.
    Down,
}

impl FromStr for ScaleDirection {
    type Err = PixelOpsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "up" => Ok(ScaleDirection::Up),
            "down" => Ok(ScaleDirection::Down),
            other => Err(PixelOpsError::invalid_argument(
                "pyramid_scale",
                format!("direction must be \"up\" or \"down\", got {other:?}"),
            )),
        }
    }
}

impl fmt::Display for ScaleDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleDirection::Up => f.write_str("up"),
            ScaleDirection::Down => f.write_str("down"),
        }
    }
}

/// Halves an image after Gaussian smoothing.
pub fn pyr_down(image: &OwnedImage) -> PixelOpsResult<OwnedImage> {
    let src = image.view();
    let width = src.width();
    let height = src.height();
    let channels = src.channels();
    let smoothed = convolve_separable(src, &PYR_KERNEL, &PYR_KERNEL, Border::Reflect101);

    let dst_width = width.div_ceil(2);
    let dst_height = height.div_ceil(2);
    let row_len = width * channels;
    let mut dst = Vec::with_capacity(dst_width * dst_height * channels);
    for y in 0..dst_height {
        let row = &smoothed[2 * y * row_len..(2 * y + 1) * row_len];
        for x in 0..dst_width {
            let base = 2 * x * channels;
            dst.extend(row[base..base + channels].iter().map(|&v| saturate_u8(v)));
        }
    }

    OwnedImage::new(dst, dst_width, dst_height, image.layout())
}

/// Doubles an image by zero insertion followed by Gaussian smoothing.
pub fn pyr_up(image: &OwnedImage) -> PixelOpsResult<OwnedImage> {
    let width = image.width();
    let height = image.height();
    let channels = image.channels();
    let dst_width = width
        .checked_mul(2)
        .ok_or(PixelOpsError::InvalidDimensions { width, height })?;
    let dst_height = height
        .checked_mul(2)
        .ok_or(PixelOpsError::InvalidDimensions { width, height })?;

    let mut sparse = OwnedImage::zeros(dst_width, dst_height, image.layout())?;
    let dst_row_len = dst_width * channels;
    let src_row_len = width * channels;
    {
        let src = image.data();
        let data = sparse.data_mut();
        for y in 0..height {
            for x in 0..width {
                let from = y * src_row_len + x * channels;
                let to = 2 * y * dst_row_len + 2 * x * channels;
                data[to..to + channels].copy_from_slice(&src[from..from + channels]);
            }
        }
    }

    let view: ImageView<'_, u8> = sparse.view();
    let smoothed = convolve_separable(view, &PYR_UP_KERNEL, &PYR_UP_KERNEL, Border::Reflect101);
    let data = smoothed.into_iter().map(saturate_u8).collect();
    OwnedImage::new(data, dst_width, dst_height, image.layout())
}

/// Applies `factor` successive pyramid passes in `direction`.
///
/// A factor of zero returns an unchanged copy.
pub fn pyramid_scale(
    image: &OwnedImage,
    factor: usize,
    direction: ScaleDirection,
) -> PixelOpsResult<OwnedImage> {
    let _span = trace_span!("pyramid_scale", factor = factor).entered();
    let mut current = image.clone();
    for _ in 0..factor {
        current = match direction {
            ScaleDirection::Up => pyr_up(&current)?,
            ScaleDirection::Down => pyr_down(&current)?,
        };
    }
    trace_event!(
        "pyramid_scale_done",
        width = current.width(),
        height = current.height()
    );
    Ok(current)
}

/// Owned image pyramid built from a base level.
pub struct ImagePyramid {
    levels: Vec<OwnedImage>,
}

impl ImagePyramid {
    /// Builds a pyramid of successive [`pyr_down`] levels.
    ///
    /// `max_levels` is clamped to at least 1 so the base level is always
    /// present. Construction stops early once a level is a single pixel wide
    /// or tall.
    pub fn build(base: &OwnedImage, max_levels: usize) -> PixelOpsResult<Self> {
        let max_levels = max_levels.max(1);
        let mut levels = vec![base.clone()];
        while levels.len() < max_levels {
            let Some(prev) = levels.last() else { break };
            if prev.width() < 2 || prev.height() < 2 {
                break;
            }
            let next = pyr_down(prev)?;
            levels.push(next);
        }
        Ok(Self { levels })
    }

    /// Returns all pyramid levels (level 0 is the base resolution).
    pub fn levels(&self) -> &[OwnedImage] {
        &self.levels
    }

    /// Returns a view for a specific pyramid level.
    pub fn level(&self, index: usize) -> Option<ImageView<'_, u8>> {
        self.levels.get(index).map(|level| level.view())
    }
}

#[cfg(test)]
mod tests {
    use super::{pyr_down, pyr_up, ScaleDirection};
    use crate::image::{ChannelLayout, OwnedImage};

    #[test]
    fn direction_parses_exact_names_only() {
        assert_eq!("up".parse::<ScaleDirection>().unwrap(), ScaleDirection::Up);
        assert_eq!("down".parse::<ScaleDirection>().unwrap(), ScaleDirection::Down);
        assert!("Up".parse::<ScaleDirection>().is_err());
        assert!("sideways".parse::<ScaleDirection>().is_err());
    }

    #[test]
    fn pyr_down_rounds_odd_sizes_up() {
        let img = OwnedImage::filled(7, 5, ChannelLayout::Gray, 10).unwrap();
        let out = pyr_down(&img).unwrap();
        assert_eq!((out.width(), out.height()), (4, 3));
        assert!(out.data().iter().all(|&v| v == 10));
    }

    #[test]
    fn pyr_up_preserves_constant_fields() {
        let img = OwnedImage::filled(3, 2, ChannelLayout::Rgb, 200).unwrap();
        let out = pyr_up(&img).unwrap();
        assert_eq!((out.width(), out.height()), (6, 4));
        assert!(out.data().iter().all(|&v| v == 200));
    }
}
