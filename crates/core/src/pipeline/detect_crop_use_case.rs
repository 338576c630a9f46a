use crate::io::infrastructure::image_codec;
use crate::segmentation::classifier::{classify, BackdropRule};
use crate::segmentation::labeling::label_components;
use crate::segmentation::morphology::MorphStrategy;
use crate::segmentation::selector::{select_subject, SelectorConfig};
use crate::shared::crop_result::CropResult;
use crate::shared::error::PipelineError;
use crate::shared::pixel_buffer::PixelBuffer;

/// Everything tunable about detection, isolated from the stage code.
#[derive(Clone, Debug, Default)]
pub struct DetectionConfig {
    pub rule: BackdropRule,
    pub morphology: MorphStrategy,
    pub selector: SelectorConfig,
}

/// Subject localization: decode → classify → clean → label → select.
///
/// Pure over its input; two calls on identical bytes yield identical
/// results. "No subject" comes back as the sentinel [`CropResult`],
/// so only decode failures are errors.
#[derive(Clone, Debug, Default)]
pub struct DetectCropUseCase {
    config: DetectionConfig,
}

impl DetectCropUseCase {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn detect(&self, image_bytes: &[u8]) -> Result<CropResult, PipelineError> {
        let buffer = image_codec::decode(image_bytes)?;
        Ok(self.detect_buffer(&buffer))
    }

    /// Detection over an already-decoded buffer.
    pub fn detect_buffer(&self, buffer: &PixelBuffer) -> CropResult {
        let raw = classify(buffer, &self.config.rule);
        let cleaned = self.config.morphology.apply(&raw);
        let (_grid, components) = label_components(&cleaned);
        log::debug!(
            "classified {} candidate px, {} px after cleaning, {} components",
            raw.foreground_count(),
            cleaned.foreground_count(),
            components.len()
        );

        let result = select_subject(
            &components,
            buffer.width(),
            buffer.height(),
            &self.config.selector,
        );
        if result.is_degenerate() {
            log::info!("no subject detected");
        } else {
            log::info!(
                "detected subject: ({},{})-({},{}), confidence {:.2}",
                result.x1,
                result.y1,
                result.x2,
                result.y2,
                result.confidence
            );
        }
        result
    }
}
