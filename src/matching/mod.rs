//! Template matching by normalized cross-correlation.
//!
//! Both inputs are reduced to grayscale, the template is slid over every
//! valid placement, and each placement scoring at least the configured
//! threshold becomes a [`MatchLocation`]. Overlapping hits are all kept; no
//! non-maximum suppression is applied. Every hit is outlined on a color copy
//! of the search image.

use crate::color::{gray_to_rgb, to_grayscale};
use crate::image::{ChannelLayout, OwnedImage};
use crate::trace::{trace_event, trace_span};
use crate::util::{PixelOpsError, PixelOpsResult};

mod plan;
mod score;

pub use plan::TemplatePlan;
pub use score::{ncc_score_map, ScoreMap};

/// Matching and rendering parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchConfig {
    /// Minimum correlation score for a placement to count as a match.
    pub threshold: f32,
    /// Rectangle color as R, G, B.
    pub box_color: [u8; 3],
    /// Rectangle line width in pixels.
    pub thickness: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.9,
            box_color: [255, 0, 0],
            thickness: 2,
        }
    }
}

/// Top-left corner of a matched placement together with the template size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchLocation {
    /// Column of the top-left corner.
    pub x: usize,
    /// Row of the top-left corner.
    pub y: usize,
    /// Template width.
    pub width: usize,
    /// Template height.
    pub height: usize,
    /// Correlation score at the placement.
    pub score: f32,
}

/// Output of [`match_template`].
#[derive(Clone, Debug)]
pub struct TemplateMatch {
    /// Color copy of the search image with one rectangle per match.
    pub rendered: OwnedImage,
    /// Raw correlation scores for every placement.
    pub scores: ScoreMap,
    /// Matches in row-major placement order.
    pub matches: Vec<MatchLocation>,
}

/// Finds every placement of `template` in `image` scoring at least 0.9.
pub fn match_template(image: &OwnedImage, template: &OwnedImage) -> PixelOpsResult<TemplateMatch> {
    match_template_with(image, template, &MatchConfig::default())
}

/// Same as [`match_template`] with explicit parameters.
pub fn match_template_with(
    image: &OwnedImage,
    template: &OwnedImage,
    config: &MatchConfig,
) -> PixelOpsResult<TemplateMatch> {
    let _span = trace_span!(
        "match_template",
        tpl_width = template.width(),
        tpl_height = template.height()
    )
    .entered();
    if template.width() > image.width() || template.height() > image.height() {
        return Err(PixelOpsError::TemplateTooLarge {
            tpl_width: template.width(),
            tpl_height: template.height(),
            img_width: image.width(),
            img_height: image.height(),
        });
    }

    let image_gray = to_grayscale(image)?;
    let template_gray = to_grayscale(template)?;
    let plan = TemplatePlan::from_view(template_gray.view())?;
    let scores = ncc_score_map(image_gray.view(), &plan)?;

    let matches = collect_matches(&scores, plan.width(), plan.height(), config.threshold);
    trace_event!("match_template_done", matches = matches.len());

    let mut rendered = gray_to_rgb(image)?;
    for m in &matches {
        draw_rectangle(
            &mut rendered,
            m.x,
            m.y,
            m.x + m.width,
            m.y + m.height,
            config.box_color,
            config.thickness,
        );
    }

    Ok(TemplateMatch {
        rendered,
        scores,
        matches,
    })
}

/// Lists every placement with `score >= threshold` in row-major order.
pub fn collect_matches(
    scores: &ScoreMap,
    width: usize,
    height: usize,
    threshold: f32,
) -> Vec<MatchLocation> {
    let mut matches = Vec::new();
    for y in 0..scores.height() {
        for x in 0..scores.width() {
            let Some(score) = scores.get(x, y) else {
                continue;
            };
            if score >= threshold {
                matches.push(MatchLocation {
                    x,
                    y,
                    width,
                    height,
                    score,
                });
            }
        }
    }
    matches
}

/// Outlines the rectangle with corners `(x0, y0)` and `(x1, y1)`, inclusive.
///
/// The outline grows inward by `thickness` pixels. Pixels beyond the canvas
/// are skipped; grayscale canvases receive the first color component.
pub fn draw_rectangle(
    canvas: &mut OwnedImage,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    color: [u8; 3],
    thickness: usize,
) {
    let thickness = thickness.max(1);
    let channels = canvas.channels();
    let mut paint = |x: usize, y: usize| {
        for c in 0..channels {
            let value = if channels == ChannelLayout::Rgb.channels() {
                color[c]
            } else {
                color[0]
            };
            canvas.set(x, y, c, value);
        }
    };

    for t in 0..thickness {
        let (left, top) = (x0 + t, y0 + t);
        let (Some(right), Some(bottom)) = (x1.checked_sub(t), y1.checked_sub(t)) else {
            break;
        };
        if left > right || top > bottom {
            break;
        }
        for x in left..=right {
            paint(x, top);
            paint(x, bottom);
        }
        for y in top..=bottom {
            paint(left, y);
            paint(right, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{draw_rectangle, match_template, MatchConfig};
    use crate::image::{ChannelLayout, OwnedImage};
    use crate::util::PixelOpsError;

    #[test]
    fn default_config_uses_point_nine() {
        let cfg = MatchConfig::default();
        assert_eq!(cfg.threshold, 0.9);
        assert_eq!(cfg.thickness, 2);
    }

    #[test]
    fn rectangle_outline_is_clipped_and_hollow() {
        let mut canvas = OwnedImage::zeros(6, 6, ChannelLayout::Rgb).unwrap();
        draw_rectangle(&mut canvas, 2, 2, 7, 7, [1, 2, 3], 1);
        assert_eq!(canvas.pixel(2, 2), Some(&[1u8, 2, 3][..]));
        assert_eq!(canvas.pixel(5, 2), Some(&[1u8, 2, 3][..]));
        assert_eq!(canvas.pixel(3, 3), Some(&[0u8, 0, 0][..]));
        assert_eq!(canvas.pixel(1, 1), Some(&[0u8, 0, 0][..]));
    }

    #[test]
    fn template_larger_than_image_fails() {
        let image = OwnedImage::zeros(4, 4, ChannelLayout::Gray).unwrap();
        let template = OwnedImage::zeros(5, 2, ChannelLayout::Gray).unwrap();
        assert!(matches!(
            match_template(&image, &template),
            Err(PixelOpsError::TemplateTooLarge { .. })
        ));
    }
}
