/// Blue-backdrop rule: blue channel must exceed this level.
pub const DEFAULT_BLUE_LEVEL: u8 = 120;
/// Blue must exceed red by this margin.
pub const DEFAULT_BLUE_MARGIN_OVER_RED: i16 = 15;
/// Blue must exceed green by this margin.
pub const DEFAULT_BLUE_MARGIN_OVER_GREEN: i16 = 10;

/// Looser blue level used when compositing, so specimen edges and
/// marbling are not clipped by the tighter localization rule.
pub const COMPOSITE_BLUE_LEVEL: u8 = 110;

/// Majority filter window radius (radius 4 = 9x9 window, 81 neighbors).
pub const DEFAULT_MAJORITY_RADIUS: usize = 4;
/// Fraction of the window that must be foreground.
pub const DEFAULT_MAJORITY_THRESHOLD: f64 = 0.6;

/// Subject area as a fraction of image area must fall inside
/// (min, max) to earn the area confidence bonus.
pub const DEFAULT_AREA_RATIO_MIN: f64 = 0.15;
pub const DEFAULT_AREA_RATIO_MAX: f64 = 0.7;
/// Fill-ratio threshold for the compactness confidence bonus.
pub const DEFAULT_FILL_RATIO_MIN: f64 = 0.5;

pub const BASE_CONFIDENCE: f64 = 0.5;
pub const AREA_RATIO_BONUS: f64 = 0.2;
pub const FILL_RATIO_BONUS: f64 = 0.3;

/// The largest component must be at least this many times the size of
/// the runner-up, or the detection is rejected as ambiguous.
pub const DEFAULT_AMBIGUITY_FACTOR: f64 = 3.0;

/// Bounding-box expansion margin as a fraction of the box's own
/// width/height. 0.01 gives tight crops; up to ~0.05 for looser ones.
pub const DEFAULT_CROP_MARGIN: f64 = 0.01;

/// JPEG quality for composited output.
pub const COMPOSITE_JPEG_QUALITY: u8 = 95;
/// JPEG quality for the plain re-crop path.
pub const RECROP_JPEG_QUALITY: u8 = 90;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
