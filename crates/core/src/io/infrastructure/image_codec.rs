use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageError, RgbImage};

use crate::shared::error::PipelineError;
use crate::shared::pixel_buffer::PixelBuffer;

/// Decode encoded image bytes into an RGB [`PixelBuffer`].
///
/// Alpha is dropped at this boundary; the segmentation stages only see
/// RGB samples.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, PipelineError> {
    let img = image::load_from_memory(bytes)
        .map_err(PipelineError::Decode)?
        .to_rgb8();
    let (width, height) = img.dimensions();
    Ok(PixelBuffer::new(img.into_raw(), width, height, 3))
}

/// Encode an RGB buffer as baseline JPEG at the given quality.
pub fn encode_jpeg(buffer: &PixelBuffer, quality: u8) -> Result<Vec<u8>, PipelineError> {
    debug_assert_eq!(buffer.channels(), 3, "encode_jpeg expects RGB");
    let img = RgbImage::from_raw(buffer.width(), buffer.height(), buffer.data().to_vec())
        .ok_or_else(|| {
            PipelineError::Encode(ImageError::Parameter(
                image::error::ParameterError::from_kind(
                    image::error::ParameterErrorKind::DimensionMismatch,
                ),
            ))
        })?;

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut out), quality);
    img.write_with_encoder(encoder)
        .map_err(PipelineError::Encode)?;
    Ok(out)
}
