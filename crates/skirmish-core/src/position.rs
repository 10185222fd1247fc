//! Map coordinates and bounds.

use std::fmt;

/// Side length of the square map.
pub const MAP_SIZE: i32 = 500;

/// Largest valid coordinate on either axis.
pub const MAP_MAX: i32 = MAP_SIZE - 1;

/// An integer map position, always within `[0, MAP_MAX]` on both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Position {
    /// Build a position, clamping each axis independently into the map.
    pub fn clamped(x: i32, y: i32) -> Self {
        Self {
            x: clamp_axis(x),
            y: clamp_axis(y),
        }
    }

    /// This position moved by `(dx, dy)`, clamped into the map.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::clamped(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_sq(self, other: Position) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    /// Whether `other` lies within `distance` of this position (inclusive).
    pub fn within(self, other: Position, distance: i32) -> bool {
        let d = i64::from(distance);
        self.distance_sq(other) <= d * d
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

fn clamp_axis(v: i32) -> i32 {
    v.clamp(0, MAP_MAX)
}
