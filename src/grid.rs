//! Sampling grid laid over the image.
//!
//! Nodes are enumerated row-major: top-to-bottom, then left-to-right within
//! each row, starting one spacing in from the image origin and stopping short
//! of the far edge. Downstream code indexes pre-allocated storage with a
//! running counter, so this ordering is a hard contract.

/// Default grid spacing in pixels.
pub const DEFAULT_GRID_SPACING: u32 = 100;

/// Pixel distance between adjacent grid nodes. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpacing(u32);

impl Default for GridSpacing {
    fn default() -> Self {
        Self(DEFAULT_GRID_SPACING)
    }
}

impl GridSpacing {
    /// Returns `None` for a zero spacing.
    pub fn new(pixels: u32) -> Option<Self> {
        if pixels == 0 {
            None
        } else {
            Some(Self(pixels))
        }
    }

    pub fn pixels(self) -> u32 {
        self.0
    }
}

/// One grid node, in pixel coordinates. Both coordinates are positive
/// multiples of the spacing and lie strictly inside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridNode {
    pub x: u32,
    pub y: u32,
}

impl GridNode {
    pub fn position(self) -> [f64; 2] {
        [self.x as f64, self.y as f64]
    }
}

/// Row count to pre-allocate for a session: `floor(w/s) * floor(h/s)`.
///
/// When a dimension is an exact multiple of the spacing this over-counts the
/// traversal by the edge row/column (which [`nodes`] excludes, as node
/// coordinates must stay strictly inside the image); the surplus rows simply
/// remain zero-filled in the result table.
pub fn node_count(width: u32, height: u32, spacing: GridSpacing) -> usize {
    let s = spacing.pixels();
    ((width / s) as usize) * ((height / s) as usize)
}

/// Enumerate grid nodes for an image of `width` x `height` pixels.
pub fn nodes(width: u32, height: u32, spacing: GridSpacing) -> GridNodes {
    let s = spacing.pixels();
    let cols = (width.saturating_sub(1) / s) as usize;
    let rows = (height.saturating_sub(1) / s) as usize;
    GridNodes {
        width,
        spacing: s,
        x: s,
        y: s,
        remaining: cols * rows,
    }
}

/// Iterator returned by [`nodes`].
#[derive(Debug, Clone)]
pub struct GridNodes {
    width: u32,
    spacing: u32,
    x: u32,
    y: u32,
    remaining: usize,
}

impl Iterator for GridNodes {
    type Item = GridNode;

    fn next(&mut self) -> Option<GridNode> {
        if self.remaining == 0 {
            return None;
        }
        let node = GridNode { x: self.x, y: self.y };
        self.remaining -= 1;
        self.x += self.spacing;
        if self.x >= self.width {
            self.x = self.spacing;
            self.y += self.spacing;
        }
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for GridNodes {}
