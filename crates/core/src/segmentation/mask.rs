/// Binary per-pixel classification grid: 0 = background, 1 = candidate
/// foreground. Same dimensions as the buffer it was derived from.
///
/// Each pipeline stage produces a fresh mask rather than mutating its
/// input, so stages stay composable and testable in isolation.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Mask {
    /// All-background mask of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    pub fn from_data(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize),
            "mask data length must equal width * height"
        );
        debug_assert!(data.iter().all(|&v| v <= 1), "mask values must be 0 or 1");
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        debug_assert!(value <= 1);
        self.data[(y as usize) * (self.width as usize) + (x as usize)] = value;
    }

    /// Number of foreground pixels.
    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_all_background() {
        let mask = Mask::new(4, 3);
        assert_eq!(mask.width(), 4);
        assert_eq!(mask.height(), 3);
        assert_eq!(mask.foreground_count(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut mask = Mask::new(4, 3);
        mask.set(2, 1, 1);
        assert_eq!(mask.get(2, 1), 1);
        assert_eq!(mask.get(1, 2), 0);
        assert_eq!(mask.foreground_count(), 1);
    }

    #[test]
    fn test_from_data_row_major() {
        // 3x2, foreground at (1,0) and (2,1)
        let mask = Mask::from_data(vec![0, 1, 0, 0, 0, 1], 3, 2);
        assert_eq!(mask.get(1, 0), 1);
        assert_eq!(mask.get(2, 1), 1);
        assert_eq!(mask.foreground_count(), 2);
    }

    #[test]
    #[should_panic(expected = "mask data length must equal width * height")]
    fn test_from_data_wrong_length_panics_in_debug() {
        Mask::from_data(vec![0; 5], 3, 2);
    }
}
