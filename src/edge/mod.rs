//! Edge detection built on 3x3 Sobel derivatives.
//!
//! Both detectors reduce the input to grayscale, apply a light 3x3 Gaussian
//! smoothing pass, and then share [`sobel`] for the derivative field.

use crate::color::to_grayscale;
use crate::filter::{convolve_separable, gaussian_blur};
use crate::image::border::Border;
use crate::image::{ChannelLayout, OwnedImage};
use crate::trace::{trace_event, trace_span};
use crate::util::math::saturate_u8;
use crate::util::{PixelOpsError, PixelOpsResult};

mod hysteresis;

pub use hysteresis::multi_stage_edges;

/// Fixed binary threshold applied by [`gradient_edges`].
pub const GRADIENT_EDGE_THRESHOLD: u8 = 50;

/// Kernel size of the pre-smoothing pass shared by the detectors.
pub(crate) const PRE_BLUR_KSIZE: usize = 3;

const DERIV: [f32; 3] = [-1.0, 0.0, 1.0];
const SMOOTH: [f32; 3] = [1.0, 2.0, 1.0];

/// Horizontal and vertical derivative planes of a grayscale image.
#[derive(Clone, Debug)]
pub struct Gradient {
    width: usize,
    height: usize,
    gx: Vec<f32>,
    gy: Vec<f32>,
}

impl Gradient {
    /// Returns the field width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the field height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Derivative along x (positive when intensity rises to the right).
    pub fn gx(&self) -> &[f32] {
        &self.gx
    }

    /// Derivative along y (positive when intensity rises downward).
    pub fn gy(&self) -> &[f32] {
        &self.gy
    }
}

/// Computes 3x3 Sobel derivatives of a single-channel image.
///
/// Borders mirror without repeating the edge pixel.
pub fn sobel(gray: &OwnedImage) -> PixelOpsResult<Gradient> {
    if gray.layout() != ChannelLayout::Gray {
        return Err(PixelOpsError::invalid_argument(
            "sobel",
            format!("expected single-channel input, got {} channels", gray.channels()),
        ));
    }
    let view = gray.view();
    Ok(Gradient {
        width: gray.width(),
        height: gray.height(),
        gx: convolve_separable(view, &DERIV, &SMOOTH, Border::Reflect101),
        gy: convolve_separable(view, &SMOOTH, &DERIV, Border::Reflect101),
    })
}

/// Grayscale conversion followed by the 3x3 smoothing pass.
pub(crate) fn prepare(image: &OwnedImage) -> PixelOpsResult<OwnedImage> {
    let gray = to_grayscale(image)?;
    gaussian_blur(&gray, PRE_BLUR_KSIZE)
}

/// Binary edge map from the averaged absolute Sobel derivatives.
///
/// The response `0.5 * |gx| + 0.5 * |gy|` is rounded and saturated to 8 bits;
/// pixels strictly above [`GRADIENT_EDGE_THRESHOLD`] become 255, all others 0.
pub fn gradient_edges(image: &OwnedImage) -> PixelOpsResult<OwnedImage> {
    let _span = trace_span!("gradient_edges").entered();
    let blurred = prepare(image)?;
    let grad = sobel(&blurred)?;

    let data: Vec<u8> = grad
        .gx
        .iter()
        .zip(&grad.gy)
        .map(|(&dx, &dy)| {
            let response = saturate_u8(0.5 * dx.abs() + 0.5 * dy.abs());
            if response > GRADIENT_EDGE_THRESHOLD {
                255
            } else {
                0
            }
        })
        .collect();
    trace_event!(
        "gradient_edges_done",
        edge_pixels = data.iter().filter(|&&v| v == 255).count()
    );
    OwnedImage::new(data, grad.width, grad.height, ChannelLayout::Gray)
}
