//! Dense normalized cross-correlation.

use crate::image::{ChannelLayout, ImageView, OwnedImage};
use crate::matching::plan::TemplatePlan;
use crate::util::{PixelOpsError, PixelOpsResult};

/// Windows whose intensity energy is at or below this are scored 0.
const MIN_WINDOW_VARIANCE: f64 = 1e-8;

/// Correlation score for every valid template placement.
///
/// Entry `(x, y)` scores the window whose top-left corner is `(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreMap {
    width: usize,
    height: usize,
    scores: Vec<f32>,
}

impl ScoreMap {
    /// Number of horizontal placements.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of vertical placements.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major scores.
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    /// Returns the score at placement `(x, y)` if it exists.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.scores.get(y * self.width + x).copied()
    }

    /// Returns the best score and its placement.
    pub fn max(&self) -> Option<(usize, usize, f32)> {
        self.scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, &score)| (idx % self.width, idx / self.width, score))
    }

    /// Min-max renormalizes the scores into an 8-bit grayscale image.
    ///
    /// A flat map renders as all zeros.
    pub fn to_image(&self) -> PixelOpsResult<OwnedImage> {
        let (lo, hi) = self
            .scores
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });
        let range = hi - lo;
        let data = self
            .scores
            .iter()
            .map(|&s| {
                if range > 0.0 {
                    ((s - lo) / range * 255.0).round() as u8
                } else {
                    0
                }
            })
            .collect();
        OwnedImage::new(data, self.width, self.height, ChannelLayout::Gray)
    }
}

/// Scores every placement of `tpl` inside `image` with zero-mean normalized
/// cross-correlation.
///
/// Scores lie in `[-1, 1]`; windows without intensity variation score 0.
pub fn ncc_score_map(image: ImageView<'_, u8>, tpl: &TemplatePlan) -> PixelOpsResult<ScoreMap> {
    let img_width = image.width();
    let img_height = image.height();
    let tpl_width = tpl.width();
    let tpl_height = tpl.height();
    if image.channels() != 1 {
        return Err(PixelOpsError::InvalidChannels {
            channels: image.channels(),
        });
    }
    if img_width < tpl_width || img_height < tpl_height {
        return Err(PixelOpsError::TemplateTooLarge {
            tpl_width,
            tpl_height,
            img_width,
            img_height,
        });
    }

    let out_width = img_width - tpl_width + 1;
    let out_height = img_height - tpl_height + 1;
    let n = (tpl_width * tpl_height) as f64;
    let var_t = tpl.var_t();
    let t_prime = tpl.zero_mean();

    let rows: Vec<&[u8]> = (0..img_height).filter_map(|y| image.row(y)).collect();
    if rows.len() != img_height {
        return Err(PixelOpsError::BufferTooSmall {
            needed: (img_height - 1) * image.stride() + img_width,
            got: image.as_slice().len(),
        });
    }

    let mut scores = Vec::with_capacity(out_width * out_height);
    for y in 0..out_height {
        for x in 0..out_width {
            let mut dot = 0.0f64;
            let mut sum_i = 0.0f64;
            let mut sum_i2 = 0.0f64;
            for ty in 0..tpl_height {
                let img_row = &rows[y + ty][x..x + tpl_width];
                let tpl_row = &t_prime[ty * tpl_width..(ty + 1) * tpl_width];
                for (&t, &v) in tpl_row.iter().zip(img_row) {
                    let value = f64::from(v);
                    dot += t * value;
                    sum_i += value;
                    sum_i2 += value * value;
                }
            }

            let var_i = sum_i2 - (sum_i * sum_i) / n;
            let score = if var_i <= MIN_WINDOW_VARIANCE {
                0.0
            } else {
                (dot / (var_t * var_i).sqrt()).clamp(-1.0, 1.0)
            };
            scores.push(score as f32);
        }
    }

    Ok(ScoreMap {
        width: out_width,
        height: out_height,
        scores,
    })
}

#[cfg(test)]
mod tests {
    use super::ncc_score_map;
    use crate::image::{ChannelLayout, ImageView};
    use crate::matching::plan::TemplatePlan;
    use crate::util::PixelOpsError;

    fn pattern(width: usize, height: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(((x * 17 + y * 9 + x * y) & 0xFF) as u8);
            }
        }
        data
    }

    #[test]
    fn score_map_matches_bruteforce_pearson() {
        let (img_width, img_height) = (7, 6);
        let image = pattern(img_width, img_height);
        let tpl: Vec<u8> = vec![3, 80, 20, 200, 90, 10];
        let image_view =
            ImageView::from_slice(&image, img_width, img_height, ChannelLayout::Gray).unwrap();
        let tpl_view = ImageView::from_slice(&tpl, 3, 2, ChannelLayout::Gray).unwrap();
        let plan = TemplatePlan::from_view(tpl_view).unwrap();
        let map = ncc_score_map(image_view, &plan).unwrap();
        assert_eq!((map.width(), map.height()), (5, 5));

        let t_mean = tpl.iter().map(|&v| v as f64).sum::<f64>() / 6.0;
        for y in 0..5 {
            for x in 0..5 {
                let window: Vec<f64> = (0..2)
                    .flat_map(|ty| (0..3).map(move |tx| (tx, ty)))
                    .map(|(tx, ty)| image[(y + ty) * img_width + x + tx] as f64)
                    .collect();
                let w_mean = window.iter().sum::<f64>() / 6.0;
                let mut num = 0.0;
                let mut den_t = 0.0;
                let mut den_w = 0.0;
                for (i, &w) in window.iter().enumerate() {
                    let t = tpl[i] as f64 - t_mean;
                    num += t * (w - w_mean);
                    den_t += t * t;
                    den_w += (w - w_mean) * (w - w_mean);
                }
                let expected = if den_w <= 1e-8 {
                    0.0
                } else {
                    num / (den_t * den_w).sqrt()
                };
                let got = map.get(x, y).unwrap() as f64;
                assert!((got - expected).abs() < 1e-5, "({x}, {y}): {got} vs {expected}");
            }
        }
    }

    #[test]
    fn oversized_template_is_rejected() {
        let image = vec![1u8, 2, 3, 4];
        let tpl = pattern(3, 1);
        let image_view = ImageView::from_slice(&image, 2, 2, ChannelLayout::Gray).unwrap();
        let tpl_view = ImageView::from_slice(&tpl, 3, 1, ChannelLayout::Gray).unwrap();
        let plan = TemplatePlan::from_view(tpl_view).unwrap();
        assert_eq!(
            ncc_score_map(image_view, &plan).unwrap_err(),
            PixelOpsError::TemplateTooLarge {
                tpl_width: 3,
                tpl_height: 1,
                img_width: 2,
                img_height: 2,
            }
        );
    }

    #[test]
    fn flat_template_is_degenerate() {
        let tpl = vec![9u8; 4];
        let view = ImageView::from_slice(&tpl, 2, 2, ChannelLayout::Gray).unwrap();
        assert!(matches!(
            TemplatePlan::from_view(view),
            Err(PixelOpsError::DegenerateTemplate { .. })
        ));
    }
}
