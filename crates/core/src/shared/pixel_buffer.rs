use ndarray::ArrayView3;

/// A decoded image: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the segmentation
/// stages treat pixel data as read-only samples. The buffer is never
/// mutated once decoded — compositing builds a fresh buffer instead.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl PixelBuffer {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// RGB triple at `(x, y)`. Alpha, if present, is skipped.
    pub fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * (self.channels as usize);
        (self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("PixelBuffer data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let buffer = PixelBuffer::new(data.clone(), 2, 2, 3);
        assert_eq!(buffer.width(), 2);
        assert_eq!(buffer.height(), 2);
        assert_eq!(buffer.channels(), 3);
        assert_eq!(buffer.data(), &data[..]);
    }

    #[test]
    fn test_rgb_at_reads_correct_pixel() {
        // 2x2 RGB: pixel (1, 1) is the last triple
        let mut data = vec![0u8; 12];
        data[9] = 10;
        data[10] = 20;
        data[11] = 30;
        let buffer = PixelBuffer::new(data, 2, 2, 3);
        assert_eq!(buffer.rgb_at(1, 1), (10, 20, 30));
    }

    #[test]
    fn test_rgb_at_skips_alpha() {
        // 2x1 RGBA
        let data = vec![1, 2, 3, 255, 4, 5, 6, 255];
        let buffer = PixelBuffer::new(data, 2, 1, 4);
        assert_eq!(buffer.rgb_at(0, 0), (1, 2, 3));
        assert_eq!(buffer.rgb_at(1, 0), (4, 5, 6));
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        let data = vec![0u8; 10]; // wrong size for 2x2x3
        PixelBuffer::new(data, 2, 2, 3);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let data = vec![0u8; 24]; // 2x4x3
        let buffer = PixelBuffer::new(data, 4, 2, 3);
        let arr = buffer.as_ndarray();
        assert_eq!(arr.shape(), &[2, 4, 3]); // (height, width, channels)
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        // 2x2 RGB: set pixel (row=1, col=0) to red
        let mut data = vec![0u8; 12];
        data[6] = 255; // row=1, col=0, R
        let buffer = PixelBuffer::new(data, 2, 2, 3);
        let arr = buffer.as_ndarray();
        assert_eq!(arr[[1, 0, 0]], 255); // R
        assert_eq!(arr[[1, 0, 1]], 0); // G
        assert_eq!(arr[[1, 0, 2]], 0); // B
    }
}
