//! Two-threshold edge detector: non-maximum suppression plus hysteresis.

use crate::edge::{prepare, sobel};
use crate::image::{ChannelLayout, OwnedImage};
use crate::trace::{trace_event, trace_span};
use crate::util::PixelOpsResult;

/// tan(22.5 deg), boundary between horizontal and diagonal gradient sectors.
const TAN_22_5: f32 = 0.414_213_57;
/// tan(67.5 deg), boundary between diagonal and vertical gradient sectors.
const TAN_67_5: f32 = 2.414_213_5;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Cell {
    Suppressed,
    Weak,
    Edge,
}

/// Binary edge map from gradient magnitude with hysteresis thresholding.
///
/// The magnitude is `|gx| + |gy|`. Local maxima along the quantized gradient
/// direction above `high_threshold` seed edges; maxima above `low_threshold`
/// survive only when 8-connected to a seed. If `low_threshold` exceeds
/// `high_threshold` the two are swapped.
pub fn multi_stage_edges(
    image: &OwnedImage,
    low_threshold: f32,
    high_threshold: f32,
) -> PixelOpsResult<OwnedImage> {
    let _span = trace_span!(
        "multi_stage_edges",
        low = low_threshold,
        high = high_threshold
    )
    .entered();
    let (low, high) = if low_threshold > high_threshold {
        (high_threshold, low_threshold)
    } else {
        (low_threshold, high_threshold)
    };

    let blurred = prepare(image)?;
    let grad = sobel(&blurred)?;
    let width = grad.width();
    let height = grad.height();
    let magnitude: Vec<f32> = grad
        .gx()
        .iter()
        .zip(grad.gy())
        .map(|(dx, dy)| dx.abs() + dy.abs())
        .collect();
    let mag_at = |x: isize, y: isize| -> f32 {
        if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
            0.0
        } else {
            magnitude[y as usize * width + x as usize]
        }
    };

    let mut cells = vec![Cell::Suppressed; width * height];
    let mut stack = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let m = magnitude[idx];
            if m <= low {
                continue;
            }
            let dx = grad.gx()[idx];
            let dy = grad.gy()[idx];
            let ax = dx.abs();
            let ay = dy.abs();
            let (xi, yi) = (x as isize, y as isize);

            let is_max = if ay < ax * TAN_22_5 {
                m > mag_at(xi - 1, yi) && m >= mag_at(xi + 1, yi)
            } else if ay > ax * TAN_67_5 {
                m > mag_at(xi, yi - 1) && m >= mag_at(xi, yi + 1)
            } else {
                let s: isize = if (dx < 0.0) != (dy < 0.0) { -1 } else { 1 };
                m > mag_at(xi - s, yi - 1) && m > mag_at(xi + s, yi + 1)
            };
            if !is_max {
                continue;
            }
            if m > high {
                cells[idx] = Cell::Edge;
                stack.push((x, y));
            } else {
                cells[idx] = Cell::Weak;
            }
        }
    }

    while let Some((x, y)) = stack.pop() {
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                let n = ny * width + nx;
                if cells[n] == Cell::Weak {
                    cells[n] = Cell::Edge;
                    stack.push((nx, ny));
                }
            }
        }
    }

    let data: Vec<u8> = cells
        .iter()
        .map(|&cell| if cell == Cell::Edge { 255 } else { 0 })
        .collect();
    trace_event!(
        "multi_stage_edges_done",
        edge_pixels = data.iter().filter(|&&v| v == 255).count()
    );
    OwnedImage::new(data, width, height, ChannelLayout::Gray)
}

#[cfg(test)]
mod tests {
    use super::multi_stage_edges;
    use crate::image::{ChannelLayout, OwnedImage};

    fn square(size: usize, lo: usize, hi: usize, value: u8) -> OwnedImage {
        let mut img = OwnedImage::zeros(size, size, ChannelLayout::Gray).unwrap();
        for y in lo..hi {
            for x in lo..hi {
                img.set(x, y, 0, value);
            }
        }
        img
    }

    #[test]
    fn flat_image_has_no_edges() {
        let img = OwnedImage::filled(16, 16, ChannelLayout::Rgb, 90).unwrap();
        let edges = multi_stage_edges(&img, 50.0, 100.0).unwrap();
        assert!(edges.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn square_outline_is_thin_and_binary() {
        let img = square(24, 8, 16, 255);
        let edges = multi_stage_edges(&img, 50.0, 150.0).unwrap();
        assert!(edges.data().iter().all(|&v| v == 0 || v == 255));
        // Interior and far background stay empty.
        assert_eq!(edges.get(12, 12, 0), Some(0));
        assert_eq!(edges.get(2, 2, 0), Some(0));
        // The left side of the square is detected somewhere across the step.
        let row: Vec<u8> = (5..11).map(|x| edges.get(x, 12, 0).unwrap()).collect();
        let hits = row.iter().filter(|&&v| v == 255).count();
        assert_eq!(hits, 1, "row around the left edge: {row:?}");
    }

    #[test]
    fn swapped_thresholds_match_ordered_ones() {
        let img = square(20, 5, 14, 180);
        let a = multi_stage_edges(&img, 40.0, 120.0).unwrap();
        let b = multi_stage_edges(&img, 120.0, 40.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn weak_edges_need_a_strong_neighbour() {
        let img = square(24, 8, 16, 40);
        // Step of 40 gives L1 magnitudes well below 1000 everywhere.
        let none = multi_stage_edges(&img, 10.0, 1000.0).unwrap();
        assert!(none.data().iter().all(|&v| v == 0));
        let some = multi_stage_edges(&img, 10.0, 50.0).unwrap();
        assert!(some.data().iter().any(|&v| v == 255));
    }
}
