use crate::shared::constants::{
    AREA_RATIO_BONUS, BASE_CONFIDENCE, DEFAULT_AMBIGUITY_FACTOR, DEFAULT_AREA_RATIO_MAX,
    DEFAULT_AREA_RATIO_MIN, DEFAULT_CROP_MARGIN, DEFAULT_FILL_RATIO_MIN, FILL_RATIO_BONUS,
};
use crate::shared::crop_result::CropResult;

use super::labeling::Component;

/// Tunables for subject selection and confidence scoring.
#[derive(Clone, Debug)]
pub struct SelectorConfig {
    /// Area-ratio window (subject pixels / image pixels) that earns the
    /// area bonus: below it suggests misdetection, above it suggests the
    /// backdrop itself was classified as foreground.
    pub area_ratio_min: f64,
    pub area_ratio_max: f64,
    /// Fill ratio above which the compactness bonus applies.
    pub fill_ratio_min: f64,
    /// Largest-to-second-largest pixel-count ratio below which the
    /// detection is rejected as ambiguous.
    pub ambiguity_factor: f64,
    /// Box expansion as a fraction of the subject's own width/height.
    pub margin: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            area_ratio_min: DEFAULT_AREA_RATIO_MIN,
            area_ratio_max: DEFAULT_AREA_RATIO_MAX,
            fill_ratio_min: DEFAULT_FILL_RATIO_MIN,
            ambiguity_factor: DEFAULT_AMBIGUITY_FACTOR,
            margin: DEFAULT_CROP_MARGIN,
        }
    }
}

/// The component with the most pixels, if any. Shared by detection and
/// compositing, which both treat "largest" as "the specimen".
pub fn largest_component(components: &[Component]) -> Option<&Component> {
    components.iter().max_by_key(|c| c.pixel_count)
}

/// Choose the subject region and emit its expanded crop box with a
/// confidence score.
///
/// Returns the sentinel when no component exists or when the runner-up
/// is close enough in size that both might be subject fragments (or the
/// tag is nearly as large as the specimen).
pub fn select_subject(
    components: &[Component],
    image_width: u32,
    image_height: u32,
    config: &SelectorConfig,
) -> CropResult {
    let Some(subject) = largest_component(components) else {
        return CropResult::sentinel();
    };

    let second_count = components
        .iter()
        .filter(|c| c.label != subject.label)
        .map(|c| c.pixel_count)
        .max()
        .unwrap_or(0);
    if (second_count as f64) * config.ambiguity_factor >= subject.pixel_count as f64 {
        log::warn!(
            "ambiguous detection: largest component {} px vs runner-up {} px",
            subject.pixel_count,
            second_count
        );
        return CropResult::sentinel();
    }

    let (x1, y1, x2, y2) = expand_bbox(subject, image_width, image_height, config.margin);

    let area_ratio = subject.pixel_count as f64 / (image_width as f64 * image_height as f64);
    let fill_ratio = subject.fill_ratio();

    let mut confidence = BASE_CONFIDENCE;
    if area_ratio > config.area_ratio_min && area_ratio < config.area_ratio_max {
        confidence += AREA_RATIO_BONUS;
    }
    if fill_ratio > config.fill_ratio_min {
        confidence += FILL_RATIO_BONUS;
    }
    confidence = (confidence * 100.0).round() / 100.0;

    CropResult::new(x1, y1, x2, y2, confidence)
}

/// Expand the subject's raw bounding box outward by `margin` of its own
/// width/height, clamped to image bounds. Returns half-open bounds.
fn expand_bbox(c: &Component, image_width: u32, image_height: u32, margin: f64) -> (u32, u32, u32, u32) {
    let margin_x = ((c.max_x - c.min_x) as f64 * margin).round() as u32;
    let margin_y = ((c.max_y - c.min_y) as f64 * margin).round() as u32;

    let x1 = c.min_x.saturating_sub(margin_x);
    let y1 = c.min_y.saturating_sub(margin_y);
    let x2 = (c.max_x + 1 + margin_x).min(image_width);
    let y2 = (c.max_y + 1 + margin_y).min(image_height);
    (x1, y1, x2, y2)
}
