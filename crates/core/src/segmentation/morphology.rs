use crate::shared::constants::{DEFAULT_MAJORITY_RADIUS, DEFAULT_MAJORITY_THRESHOLD};

use super::mask::Mask;

/// Mask-cleaning strategy. The drafts behind this pipeline disagreed on
/// the denoising approach, so it is a configuration-selected strategy
/// over a shared contract rather than duplicated pipelines.
#[derive(Clone, Debug, PartialEq)]
pub enum MorphStrategy {
    /// Box-neighborhood majority vote: an interior pixel is foreground
    /// iff more than `threshold` of its `(2r+1)²` window is foreground.
    /// Pixels within `radius` of the border are left as background.
    Majority { radius: usize, threshold: f64 },
    /// Closing (fill small background inclusions such as glare) followed
    /// by opening with a smaller kernel (strip thin connections and
    /// debris).
    CloseOpen {
        close_radius: usize,
        open_radius: usize,
    },
}

impl MorphStrategy {
    pub fn apply(&self, mask: &Mask) -> Mask {
        match *self {
            Self::Majority { radius, threshold } => majority_filter(mask, radius, threshold),
            Self::CloseOpen {
                close_radius,
                open_radius,
            } => {
                let closed = erode(&dilate(mask, close_radius), close_radius);
                dilate(&erode(&closed, open_radius), open_radius)
            }
        }
    }
}

impl Default for MorphStrategy {
    fn default() -> Self {
        Self::Majority {
            radius: DEFAULT_MAJORITY_RADIUS,
            threshold: DEFAULT_MAJORITY_THRESHOLD,
        }
    }
}

/// Majority vote over an odd square window. Border pixels that the
/// window cannot cover stay background; mirroring the window instead
/// would be a refinement, not done here.
fn majority_filter(mask: &Mask, radius: usize, threshold: f64) -> Mask {
    let width = mask.width() as usize;
    let height = mask.height() as usize;
    let window = 2 * radius + 1;
    let min_count = (window * window) as f64 * threshold;

    let mut cleaned = Mask::new(mask.width(), mask.height());
    if width < window || height < window {
        return cleaned;
    }

    let data = mask.data();
    for y in radius..height - radius {
        for x in radius..width - radius {
            let mut sum: usize = 0;
            for ky in y - radius..=y + radius {
                let row = ky * width;
                for kx in x - radius..=x + radius {
                    sum += data[row + kx] as usize;
                }
            }
            if (sum as f64) > min_count {
                cleaned.set(x as u32, y as u32, 1);
            }
        }
    }
    cleaned
}

/// Set-to-1 if any pixel in the window is 1. The window is clipped at
/// image edges.
fn dilate(mask: &Mask, radius: usize) -> Mask {
    morph_window(mask, radius, |sum, _| sum > 0)
}

/// Keep-1 only if every pixel in the (clipped) window is 1.
fn erode(mask: &Mask, radius: usize) -> Mask {
    morph_window(mask, radius, |sum, count| sum == count)
}

fn morph_window(mask: &Mask, radius: usize, keep: impl Fn(usize, usize) -> bool) -> Mask {
    let width = mask.width() as usize;
    let height = mask.height() as usize;
    let data = mask.data();
    let r = radius as isize;

    let mut out = Mask::new(mask.width(), mask.height());
    for y in 0..height as isize {
        for x in 0..width as isize {
            let y0 = (y - r).max(0) as usize;
            let y1 = ((y + r) as usize).min(height - 1);
            let x0 = (x - r).max(0) as usize;
            let x1 = ((x + r) as usize).min(width - 1);

            let mut sum = 0usize;
            for ky in y0..=y1 {
                let row = ky * width;
                for kx in x0..=x1 {
                    sum += data[row + kx] as usize;
                }
            }
            let count = (y1 - y0 + 1) * (x1 - x0 + 1);
            if keep(sum, count) {
                out.set(x as u32, y as u32, 1);
            }
        }
    }
    out
}
