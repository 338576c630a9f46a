//! Synthetic-image helpers shared by the pipeline tests.

use std::io::Cursor;

use crate::shared::pixel_buffer::PixelBuffer;

/// Saturated blue felt, well inside the default chroma rule.
pub const BACKDROP_RGB: (u8, u8, u8) = (60, 80, 180);
/// Pink meat tone: not backdrop under any configured rule.
pub const SUBJECT_RGB: (u8, u8, u8) = (200, 120, 130);
/// Near-white paper tag.
pub const TAG_RGB: (u8, u8, u8) = (250, 250, 250);

/// Build a solid-backdrop frame with filled rectangles painted over it.
/// Rectangle bounds are half-open `(x1, y1, x2, y2, rgb)`.
pub fn synthetic_image(
    width: u32,
    height: u32,
    backdrop: (u8, u8, u8),
    rects: &[(u32, u32, u32, u32, (u8, u8, u8))],
) -> PixelBuffer {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for _ in 0..(width * height) {
        data.push(backdrop.0);
        data.push(backdrop.1);
        data.push(backdrop.2);
    }
    let mut buffer_data = data;
    for &(x1, y1, x2, y2, rgb) in rects {
        for y in y1..y2 {
            for x in x1..x2 {
                let idx = ((y * width + x) * 3) as usize;
                buffer_data[idx] = rgb.0;
                buffer_data[idx + 1] = rgb.1;
                buffer_data[idx + 2] = rgb.2;
            }
        }
    }
    PixelBuffer::new(buffer_data, width, height, 3)
}

/// Losslessly encode a buffer so byte-level entry points can be tested.
pub fn buffer_to_png(buffer: &PixelBuffer) -> Vec<u8> {
    let img =
        image::RgbImage::from_raw(buffer.width(), buffer.height(), buffer.data().to_vec()).unwrap();
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}
