//! Template statistics precomputed once per match call.

use crate::image::ImageView;
use crate::util::{PixelOpsError, PixelOpsResult};

/// Zero-mean template buffer and its energy.
pub struct TemplatePlan {
    width: usize,
    height: usize,
    mean: f64,
    var_t: f64,
    zero_mean: Vec<f64>,
}

impl TemplatePlan {
    /// Builds a plan from a single-channel template view.
    pub fn from_view(tpl: ImageView<'_, u8>) -> PixelOpsResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        if tpl.channels() != 1 {
            return Err(PixelOpsError::InvalidChannels {
                channels: tpl.channels(),
            });
        }
        let count = width
            .checked_mul(height)
            .ok_or(PixelOpsError::InvalidDimensions { width, height })?;

        let mut values = Vec::with_capacity(count);
        for y in 0..height {
            let row = tpl.row(y).ok_or(PixelOpsError::BufferTooSmall {
                needed: y * tpl.stride() + width,
                got: tpl.as_slice().len(),
            })?;
            values.extend(row.iter().map(|&v| f64::from(v)));
        }

        let mean = values.iter().sum::<f64>() / count as f64;
        let zero_mean: Vec<f64> = values.into_iter().map(|v| v - mean).collect();
        let var_t: f64 = zero_mean.iter().map(|v| v * v).sum();
        if var_t <= 1e-8 {
            return Err(PixelOpsError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        Ok(Self {
            width,
            height,
            mean,
            var_t,
            zero_mean,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the mean intensity of the template.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the sum of squared deviations from the mean.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn zero_mean(&self) -> &[f64] {
        &self.zero_mean
    }
}
