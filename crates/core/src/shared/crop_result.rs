use serde::{Deserialize, Serialize};

/// The outcome of subject detection: a half-open crop box
/// `[x1, x2) × [y1, y2)` in pixel coordinates plus a heuristic
/// confidence in `[0, 1]`.
///
/// "No subject found" is not an error: it is the explicit sentinel
/// value (confidence 0, all-zero box) so callers can persist and
/// inspect it without exception handling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropResult {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    pub confidence: f64,
}

impl CropResult {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32, confidence: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            confidence,
        }
    }

    /// The degenerate "no subject detected" result.
    pub fn sentinel() -> Self {
        Self::new(0, 0, 0, 0, 0.0)
    }

    /// True for any box without positive area. The sentinel is the only
    /// degenerate value the pipeline itself produces.
    pub fn is_degenerate(&self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    /// Whether the box lies entirely within an image of the given size.
    pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        self.x2 <= image_width && self.y2 <= image_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sentinel_is_degenerate() {
        let s = CropResult::sentinel();
        assert!(s.is_degenerate());
        assert_relative_eq!(s.confidence, 0.0);
        assert_eq!((s.x1, s.y1, s.x2, s.y2), (0, 0, 0, 0));
    }

    #[test]
    fn test_positive_area_box_is_not_degenerate() {
        let c = CropResult::new(10, 20, 110, 220, 0.8);
        assert!(!c.is_degenerate());
        assert_eq!(c.width(), 100);
        assert_eq!(c.height(), 200);
    }

    #[test]
    fn test_zero_width_box_is_degenerate() {
        assert!(CropResult::new(50, 0, 50, 100, 0.5).is_degenerate());
    }

    #[test]
    fn test_fits_within_bounds() {
        let c = CropResult::new(0, 0, 100, 80, 0.7);
        assert!(c.fits_within(100, 80));
        assert!(!c.fits_within(99, 80));
        assert!(!c.fits_within(100, 79));
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let c = CropResult::new(1, 2, 3, 4, 0.75);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"x1":1,"y1":2,"x2":3,"y2":4,"confidence":0.75}"#);
        let back: CropResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
