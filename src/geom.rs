//! 2D geometry shared by the clustering kernels.
//!
//! Points live in canvas coordinates: `x` grows rightward, `y` grows
//! downward, both in pixels. Distances are Euclidean.

use rand::Rng;

/// A position on the canvas.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Create a new position.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The rectangular area points are generated in, anchored at the origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Create bounds of the given size. Both dimensions must be positive.
    pub fn new(width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0);
        Self { width, height }
    }

    /// Sample a uniform random position within the bounds.
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            rng.random_range(0.0..self.width),
            rng.random_range(0.0..self.height),
        )
    }
}

impl Default for Bounds {
    /// The canvas size of the reference visualization.
    fn default() -> Self {
        Self::new(800.0, 500.0)
    }
}

/// Indices of all points within `epsilon` of `positions[idx]`, the query
/// point itself excluded. The boundary is inclusive (`<= epsilon`).
///
/// Brute force, O(n) per call. At the few hundred points this crate
/// targets, a spatial index would not pay for itself.
pub fn neighbors(positions: &[Vec2], idx: usize, epsilon: f32) -> Vec<usize> {
    let point = positions[idx];
    positions
        .iter()
        .enumerate()
        .filter(|(j, other)| *j != idx && point.distance(**other) <= epsilon)
        .map(|(j, _)| j)
        .collect()
}
