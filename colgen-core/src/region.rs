/// Axis-aligned rectangle in grid-cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Two regions are disjoint iff one lies entirely left of, right of,
    /// above or below the other. Touching edges do not overlap.
    pub fn overlaps(&self, other: &Region) -> bool {
        !(self.x + self.width <= other.x
            || self.x >= other.x + other.width
            || self.y + self.height <= other.y
            || self.y >= other.y + other.height)
    }
}
