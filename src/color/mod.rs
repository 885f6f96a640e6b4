//! Color-space conversions and per-channel value shifting.
//!
//! Color images use the [`ChannelLayout::Rgb`] channel order.

use crate::image::{ChannelLayout, OwnedImage};
use crate::trace::trace_span;
use crate::util::math::saturate_u8;
use crate::util::{PixelOpsError, PixelOpsResult};

/// ITU-R BT.601 luma weights for R, G, B.
pub const BT601_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Reduces a color image to one luminance channel using BT.601 weights.
///
/// Grayscale input is returned as an unchanged copy.
pub fn to_grayscale(image: &OwnedImage) -> PixelOpsResult<OwnedImage> {
    let _span = trace_span!("to_grayscale").entered();
    match image.layout() {
        ChannelLayout::Gray => Ok(image.clone()),
        ChannelLayout::Rgb => {
            let [wr, wg, wb] = BT601_WEIGHTS;
            let data = image
                .data()
                .chunks_exact(3)
                .map(|px| saturate_u8(wr * px[0] as f32 + wg * px[1] as f32 + wb * px[2] as f32))
                .collect();
            OwnedImage::new(data, image.width(), image.height(), ChannelLayout::Gray)
        }
    }
}

/// Expands a grayscale image to three identical channels.
///
/// Color input is returned as an unchanged copy.
pub fn gray_to_rgb(image: &OwnedImage) -> PixelOpsResult<OwnedImage> {
    match image.layout() {
        ChannelLayout::Rgb => Ok(image.clone()),
        ChannelLayout::Gray => {
            let data = image.data().iter().flat_map(|&v| [v, v, v]).collect();
            OwnedImage::new(data, image.width(), image.height(), ChannelLayout::Rgb)
        }
    }
}

/// Converts RGB to hue, saturation, value in the 8-bit convention.
///
/// Hue is stored as degrees halved (`0..180`) so it fits a byte; saturation
/// and value span `0..=255`. The output keeps the `Rgb` layout tag but its
/// channels carry H, S, V.
pub fn to_hsv(image: &OwnedImage) -> PixelOpsResult<OwnedImage> {
    let _span = trace_span!("to_hsv").entered();
    if image.layout() != ChannelLayout::Rgb {
        return Err(PixelOpsError::invalid_argument(
            "to_hsv",
            format!("expected 3-channel color input, got {} channel(s)", image.channels()),
        ));
    }
    let mut data = Vec::with_capacity(image.data().len());
    for px in image.data().chunks_exact(3) {
        data.extend_from_slice(&rgb_to_hsv(px[0], px[1], px[2]));
    }
    OwnedImage::new(data, image.width(), image.height(), ChannelLayout::Rgb)
}

fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = (max - min) as f32;
    let v = max;
    let s = if max == 0 {
        0
    } else {
        saturate_u8(diff * 255.0 / max as f32)
    };
    if diff == 0.0 {
        return [0, s, v];
    }

    let (r, g, b) = (r as f32, g as f32, b as f32);
    let mut h = if v as f32 == r {
        60.0 * (g - b) / diff
    } else if v as f32 == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }
    let half = (h * 0.5).round();
    let h = if half >= 180.0 { 0 } else { half as u8 };
    [h, s, v]
}

/// Adds `delta` to every channel of every pixel, clamping to `0..=255`.
///
/// This is a uniform per-channel offset on whatever representation `src`
/// holds; it does not rotate hue angles. `dst` must match the shape of `src`
/// and is overwritten.
pub fn hue_shift(src: &OwnedImage, dst: &mut OwnedImage, delta: i32) -> PixelOpsResult<()> {
    let _span = trace_span!("hue_shift", delta = delta).entered();
    if !src.same_shape(dst) {
        return Err(PixelOpsError::ShapeMismatch {
            op: "hue_shift",
            expected: src.shape_label(),
            got: dst.shape_label(),
        });
    }
    for (out, &value) in dst.data_mut().iter_mut().zip(src.data()) {
        *out = (i32::from(value).saturating_add(delta)).clamp(0, 255) as u8;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{gray_to_rgb, hue_shift, rgb_to_hsv, to_grayscale, to_hsv};
    use crate::image::{ChannelLayout, OwnedImage};
    use crate::util::PixelOpsError;

    #[test]
    fn grayscale_uses_perceptual_weights() {
        let img = OwnedImage::new(
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
            4,
            1,
            ChannelLayout::Rgb,
        )
        .unwrap();
        let gray = to_grayscale(&img).unwrap();
        assert_eq!(gray.layout(), ChannelLayout::Gray);
        assert_eq!(gray.data(), &[76, 150, 29, 255]);
    }

    #[test]
    fn gray_round_trips_through_rgb() {
        let gray = OwnedImage::new(vec![0, 17, 200, 255], 2, 2, ChannelLayout::Gray).unwrap();
        let rgb = gray_to_rgb(&gray).unwrap();
        assert_eq!(rgb.pixel(1, 0), Some(&[17u8, 17, 17][..]));
        assert_eq!(to_grayscale(&rgb).unwrap(), gray);
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(rgb_to_hsv(255, 0, 0), [0, 255, 255]);
        assert_eq!(rgb_to_hsv(0, 255, 0), [60, 255, 255]);
        assert_eq!(rgb_to_hsv(0, 0, 255), [120, 255, 255]);
        assert_eq!(rgb_to_hsv(128, 128, 128), [0, 0, 128]);
        assert_eq!(rgb_to_hsv(0, 0, 0), [0, 0, 0]);
    }

    #[test]
    fn hsv_requires_color_input() {
        let gray = OwnedImage::zeros(2, 2, ChannelLayout::Gray).unwrap();
        assert!(matches!(
            to_hsv(&gray),
            Err(PixelOpsError::InvalidArgument { op: "to_hsv", .. })
        ));
    }

    #[test]
    fn hue_shift_clamps_both_directions() {
        let src = OwnedImage::new(vec![0, 100, 250], 1, 1, ChannelLayout::Rgb).unwrap();
        let mut dst = OwnedImage::zeros(1, 1, ChannelLayout::Rgb).unwrap();
        hue_shift(&src, &mut dst, 10).unwrap();
        assert_eq!(dst.data(), &[10, 110, 255]);
        hue_shift(&src, &mut dst, -120).unwrap();
        assert_eq!(dst.data(), &[0, 0, 130]);
    }
}
