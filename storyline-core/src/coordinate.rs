//! Pixel-space coordinate primitives

/// A point in surface pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    /// Creates a new coordinate
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The owning coordinate pair of an annotation: `anchor` sits on the
/// baseline (value 0), `target` on the data point itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatePair {
    pub anchor: Coordinate,
    pub target: Coordinate,
}

impl CoordinatePair {
    /// Creates a new anchor/target pair
    pub const fn new(anchor: Coordinate, target: Coordinate) -> Self {
        Self { anchor, target }
    }
}
