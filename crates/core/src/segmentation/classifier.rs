use crate::shared::constants::{
    DEFAULT_BLUE_LEVEL, DEFAULT_BLUE_MARGIN_OVER_GREEN, DEFAULT_BLUE_MARGIN_OVER_RED,
};
use crate::shared::pixel_buffer::PixelBuffer;

use super::mask::Mask;

/// Which color channel identifies a chroma backdrop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// Per-pixel background rule: a small set of linear inequalities over
/// R, G, B. The backdrop color is a deployment parameter, so the rule
/// is configuration rather than a hardcoded constant.
///
/// Near-white pixels (the paper tag) deliberately classify as
/// foreground here; the tag is excluded later by region selection,
/// where its size is the discriminant, not its color.
#[derive(Clone, Debug, PartialEq)]
pub enum BackdropRule {
    /// Colored backdrop: the dominant channel exceeds `min_level` and
    /// exceeds each other channel by the given margin.
    Chroma {
        channel: Channel,
        min_level: u8,
        margin_over_first: i16,
        margin_over_second: i16,
    },
    /// Light/neutral backdrop: every channel is at least `min_level`
    /// and the channel spread stays below `max_spread`.
    Luma { min_level: u8, max_spread: u8 },
}

impl BackdropRule {
    /// The blue-felt backdrop rule used by the photo rig.
    pub fn blue() -> Self {
        Self::Chroma {
            channel: Channel::Blue,
            min_level: DEFAULT_BLUE_LEVEL,
            margin_over_first: DEFAULT_BLUE_MARGIN_OVER_RED,
            margin_over_second: DEFAULT_BLUE_MARGIN_OVER_GREEN,
        }
    }

    /// Same inequalities with a different blue cutoff.
    pub fn blue_with_level(min_level: u8) -> Self {
        Self::Chroma {
            channel: Channel::Blue,
            min_level,
            margin_over_first: DEFAULT_BLUE_MARGIN_OVER_RED,
            margin_over_second: DEFAULT_BLUE_MARGIN_OVER_GREEN,
        }
    }

    /// A white/light backdrop rule.
    pub fn white() -> Self {
        Self::Luma {
            min_level: 200,
            max_spread: 30,
        }
    }

    /// Pure predicate: is this pixel part of the backdrop?
    #[inline]
    pub fn is_background(&self, r: u8, g: u8, b: u8) -> bool {
        match *self {
            Self::Chroma {
                channel,
                min_level,
                margin_over_first,
                margin_over_second,
            } => {
                // `first`/`second` are the two non-dominant channels in
                // RGB order.
                let (dom, first, second) = match channel {
                    Channel::Red => (r, g, b),
                    Channel::Green => (g, r, b),
                    Channel::Blue => (b, r, g),
                };
                dom > min_level
                    && (dom as i16) > (first as i16) + margin_over_first
                    && (dom as i16) > (second as i16) + margin_over_second
            }
            Self::Luma {
                min_level,
                max_spread,
            } => {
                let min = r.min(g).min(b);
                let max = r.max(g).max(b);
                min >= min_level && (max - min) <= max_spread
            }
        }
    }
}

impl Default for BackdropRule {
    fn default() -> Self {
        Self::blue()
    }
}

/// Classify every pixel of `buffer` against `rule`, producing the raw
/// foreground-candidate mask (1 = not backdrop).
pub fn classify(buffer: &PixelBuffer, rule: &BackdropRule) -> Mask {
    let width = buffer.width();
    let height = buffer.height();
    let pixels = buffer.as_ndarray();

    let mut mask = Mask::new(width, height);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let (r, g, b) = (pixels[[y, x, 0]], pixels[[y, x, 1]], pixels[[y, x, 2]]);
            if !rule.is_background(r, g, b) {
                mask.set(x as u32, y as u32, 1);
            }
        }
    }
    mask
}
