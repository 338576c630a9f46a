use super::mask::Mask;

/// Summary of one connected foreground region, accumulated during the
/// flood fill. Bounding box is inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Component {
    pub label: u32,
    pub pixel_count: usize,
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Component {
    /// Bounding-box area in pixels.
    pub fn bbox_area(&self) -> usize {
        ((self.max_x - self.min_x + 1) as usize) * ((self.max_y - self.min_y + 1) as usize)
    }

    /// Pixel count over bounding-box area; 1.0 for a filled rectangle.
    pub fn fill_ratio(&self) -> f64 {
        self.pixel_count as f64 / self.bbox_area() as f64
    }
}

/// Per-pixel component ids: 0 = background, positive values are 1-based
/// labels assigned in row-major first-encounter order, so labeling is
/// deterministic for a given mask.
#[derive(Clone, Debug)]
pub struct LabelGrid {
    labels: Vec<u32>,
    width: u32,
    height: u32,
}

impl LabelGrid {
    fn new(width: u32, height: u32) -> Self {
        Self {
            labels: vec![0; (width as usize) * (height as usize)],
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

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.labels[(y as usize) * (self.width as usize) + (x as usize)]
    }

    #[inline]
    fn set(&mut self, x: u32, y: u32, label: u32) {
        self.labels[(y as usize) * (self.width as usize) + (x as usize)] = label;
    }
}

/// Partition a cleaned mask into 4-connected components.
///
/// Scans in row-major order; each unlabeled foreground pixel seeds a
/// flood fill with an explicit stack (a large contiguous specimen would
/// overflow the call stack if the fill recursed). O(width × height)
/// time and space.
pub fn label_components(mask: &Mask) -> (LabelGrid, Vec<Component>) {
    let width = mask.width();
    let height = mask.height();
    let mut grid = LabelGrid::new(width, height);
    let mut components = Vec::new();
    let mut stack: Vec<(u32, u32)> = Vec::new();

    let mut next_label: u32 = 1;
    for y in 0..height {
        for x in 0..width {
            if mask.get(x, y) != 1 || grid.get(x, y) != 0 {
                continue;
            }

            let label = next_label;
            next_label += 1;
            let mut component = Component {
                label,
                pixel_count: 0,
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            };

            stack.push((x, y));
            while let Some((cx, cy)) = stack.pop() {
                if mask.get(cx, cy) != 1 || grid.get(cx, cy) != 0 {
                    continue;
                }
                grid.set(cx, cy, label);
                component.pixel_count += 1;
                component.min_x = component.min_x.min(cx);
                component.min_y = component.min_y.min(cy);
                component.max_x = component.max_x.max(cx);
                component.max_y = component.max_y.max(cy);

                if cx + 1 < width {
                    stack.push((cx + 1, cy));
                }
                if cx > 0 {
                    stack.push((cx - 1, cy));
                }
                if cy + 1 < height {
                    stack.push((cx, cy + 1));
                }
                if cy > 0 {
                    stack.push((cx, cy - 1));
                }
            }

            components.push(component);
        }
    }

    (grid, components)
}
