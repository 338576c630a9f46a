use crate::io::infrastructure::image_codec;
use crate::segmentation::classifier::{classify, BackdropRule};
use crate::segmentation::labeling::label_components;
use crate::segmentation::morphology::MorphStrategy;
use crate::segmentation::selector::largest_component;
use crate::shared::constants::{COMPOSITE_BLUE_LEVEL, COMPOSITE_JPEG_QUALITY, RECROP_JPEG_QUALITY};
use crate::shared::crop_result::CropResult;
use crate::shared::error::PipelineError;
use crate::shared::pixel_buffer::PixelBuffer;

/// Compositing tunables, independent of the detection tunables: a
/// looser rule keeps specimen edges and marbling, whereas detection
/// prefers a tighter rule for box fitting.
#[derive(Clone, Debug)]
pub struct CompositeConfig {
    pub rule: BackdropRule,
    pub morphology: MorphStrategy,
    /// Flat fill for every pixel outside the subject component.
    pub background: [u8; 3],
    pub jpeg_quality: u8,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            rule: BackdropRule::blue_with_level(COMPOSITE_BLUE_LEVEL),
            morphology: MorphStrategy::default(),
            background: [255, 255, 255],
            jpeg_quality: COMPOSITE_JPEG_QUALITY,
        }
    }
}

/// Background removal and cropping: re-runs mask → clean → label with
/// the compositing rule, keeps original colors on the subject
/// component, flattens everything else, and extracts the crop box.
#[derive(Clone, Debug, Default)]
pub struct CompositeCropUseCase {
    config: CompositeConfig,
}

impl CompositeCropUseCase {
    pub fn new(config: CompositeConfig) -> Self {
        Self { config }
    }

    /// Composite and crop, returning encoded JPEG bytes.
    ///
    /// A degenerate crop (the detection sentinel) is a usage error:
    /// this refuses up front rather than emitting a zero-size image.
    pub fn composite(
        &self,
        image_bytes: &[u8],
        crop: &CropResult,
    ) -> Result<Vec<u8>, PipelineError> {
        let buffer = image_codec::decode(image_bytes)?;
        let out = self.composite_buffer(&buffer, crop)?;
        image_codec::encode_jpeg(&out, self.config.jpeg_quality)
    }

    /// Compositing over an already-decoded buffer.
    pub fn composite_buffer(
        &self,
        buffer: &PixelBuffer,
        crop: &CropResult,
    ) -> Result<PixelBuffer, PipelineError> {
        check_crop(crop, buffer.width(), buffer.height())?;

        let raw = classify(buffer, &self.config.rule);
        let cleaned = self.config.morphology.apply(&raw);
        let (grid, components) = label_components(&cleaned);
        let subject_label = largest_component(&components).map(|c| c.label);
        log::debug!(
            "compositing with subject label {:?} of {} components",
            subject_label,
            components.len()
        );

        let pixels = buffer.as_ndarray();
        let [bg_r, bg_g, bg_b] = self.config.background;
        let mut out = Vec::with_capacity((crop.width() * crop.height() * 3) as usize);
        for y in crop.y1..crop.y2 {
            for x in crop.x1..crop.x2 {
                let on_subject = subject_label.is_some_and(|l| grid.get(x, y) == l);
                if on_subject {
                    let (yy, xx) = (y as usize, x as usize);
                    out.push(pixels[[yy, xx, 0]]);
                    out.push(pixels[[yy, xx, 1]]);
                    out.push(pixels[[yy, xx, 2]]);
                } else {
                    out.push(bg_r);
                    out.push(bg_g);
                    out.push(bg_b);
                }
            }
        }
        Ok(PixelBuffer::new(out, crop.width(), crop.height(), 3))
    }

    /// Plain re-crop at stored coordinates: no background flattening,
    /// encoded at the serving quality.
    pub fn recrop(&self, image_bytes: &[u8], crop: &CropResult) -> Result<Vec<u8>, PipelineError> {
        let buffer = image_codec::decode(image_bytes)?;
        check_crop(crop, buffer.width(), buffer.height())?;

        let pixels = buffer.as_ndarray();
        let mut out = Vec::with_capacity((crop.width() * crop.height() * 3) as usize);
        for y in crop.y1..crop.y2 {
            for x in crop.x1..crop.x2 {
                let (yy, xx) = (y as usize, x as usize);
                out.push(pixels[[yy, xx, 0]]);
                out.push(pixels[[yy, xx, 1]]);
                out.push(pixels[[yy, xx, 2]]);
            }
        }
        let cropped = PixelBuffer::new(out, crop.width(), crop.height(), 3);
        image_codec::encode_jpeg(&cropped, RECROP_JPEG_QUALITY)
    }
}

fn check_crop(crop: &CropResult, width: u32, height: u32) -> Result<(), PipelineError> {
    if crop.is_degenerate() {
        return Err(PipelineError::DegenerateCrop);
    }
    if !crop.fits_within(width, height) {
        return Err(PipelineError::CropOutOfBounds {
            x1: crop.x1,
            y1: crop.y1,
            x2: crop.x2,
            y2: crop.y2,
            width,
            height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::detect_crop_use_case::{DetectCropUseCase, DetectionConfig};
    use crate::pipeline::test_fixtures::{synthetic_image, BACKDROP_RGB, SUBJECT_RGB};

    fn use_case() -> CompositeCropUseCase {
        CompositeCropUseCase::new(CompositeConfig::default())
    }

    #[test]
    fn test_composite_with_sentinel_fails_without_output() {
        let buffer = synthetic_image(50, 50, BACKDROP_RGB, &[]);
        let result = use_case().composite_buffer(&buffer, &CropResult::sentinel());
        assert!(matches!(result, Err(PipelineError::DegenerateCrop)));
    }

    #[test]
    fn test_composite_out_of_bounds_crop_fails() {
        let buffer = synthetic_image(50, 50, BACKDROP_RGB, &[]);
        let crop = CropResult::new(0, 0, 60, 40, 0.9);
        let result = use_case().composite_buffer(&buffer, &crop);
        assert!(matches!(result, Err(PipelineError::CropOutOfBounds { .. })));
    }

    #[test]
    fn test_composite_keeps_subject_and_flattens_backdrop() {
        let buffer = synthetic_image(120, 120, BACKDROP_RGB, &[(30, 30, 90, 90, SUBJECT_RGB)]);
        let crop = DetectCropUseCase::new(DetectionConfig::default()).detect_buffer(&buffer);
        assert!(!crop.is_degenerate());

        let out = use_case().composite_buffer(&buffer, &crop).unwrap();
        assert_eq!(out.width(), crop.width());
        assert_eq!(out.height(), crop.height());

        // Center of the subject keeps its original color.
        let cx = (60 - crop.x1, 60 - crop.y1);
        assert_eq!(out.rgb_at(cx.0, cx.1), SUBJECT_RGB);
        // A corner of the crop box (expanded past the subject) is flat white.
        assert_eq!(out.rgb_at(0, 0), (255, 255, 255));
    }

    #[test]
    fn test_composite_crop_dimensions_match_box() {
        let buffer = synthetic_image(120, 120, BACKDROP_RGB, &[(30, 30, 90, 90, SUBJECT_RGB)]);
        let crop = CropResult::new(25, 25, 95, 95, 0.9);
        let out = use_case().composite_buffer(&buffer, &crop).unwrap();
        assert_eq!(out.width(), 70);
        assert_eq!(out.height(), 70);
    }

    #[test]
    fn test_recrop_at_same_coordinates_is_stable() {
        use crate::io::infrastructure::image_codec;
        let buffer = synthetic_image(120, 120, BACKDROP_RGB, &[(30, 30, 90, 90, SUBJECT_RGB)]);
        let crop = CropResult::new(20, 20, 100, 100, 0.9);

        let first = use_case()
            .composite_buffer(&buffer, &crop)
            .unwrap();
        // Cropping the already-cropped buffer over its full extent
        // changes nothing.
        let full = CropResult::new(0, 0, first.width(), first.height(), 1.0);
        let pixels_before = first.data().to_vec();
        let bytes = image_codec::encode_jpeg(&first, 100).unwrap();
        let again = use_case().recrop(&bytes, &full).unwrap();
        let decoded = image_codec::decode(&again).unwrap();
        assert_eq!(decoded.width(), first.width());
        assert_eq!(decoded.height(), first.height());
        // JPEG re-encode is lossy; geometry is the stable part.
        assert_eq!(pixels_before.len(), decoded.data().len());
    }

    #[test]
    fn test_recrop_rejects_sentinel() {
        let buffer = synthetic_image(40, 40, BACKDROP_RGB, &[]);
        let bytes = crate::pipeline::test_fixtures::buffer_to_png(&buffer);
        let result = use_case().recrop(&bytes, &CropResult::sentinel());
        assert!(matches!(result, Err(PipelineError::DegenerateCrop)));
    }

    #[test]
    fn test_no_component_under_looser_rule_yields_flat_white_crop() {
        // Whole frame is backdrop; a manually supplied box must come
        // back fully flattened rather than leaking backdrop color.
        let buffer = synthetic_image(60, 60, BACKDROP_RGB, &[]);
        let crop = CropResult::new(10, 10, 30, 30, 0.5);
        let out = use_case().composite_buffer(&buffer, &crop).unwrap();
        for y in 0..out.height() {
            for x in 0..out.width() {
                assert_eq!(out.rgb_at(x, y), (255, 255, 255));
            }
        }
    }
}
