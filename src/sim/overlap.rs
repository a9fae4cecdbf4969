//! Overlap checks for square balloons
//!
//! Two tests are applied to each candidate position: centre spacing (sum of
//! half-sizes plus padding) and an axis-aligned box intersection test. The box
//! test also catches pairs of very unequal sizes that the spacing test lets
//! through along a diagonal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Slack for float rounding when checking containment
const EDGE_TOLERANCE: f32 = 1e-3;

/// Axis-aligned square bounds, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub size: f32,
}

impl Bounds {
    pub fn new(min: Vec2, size: f32) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + Vec2::splat(self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + Vec2::splat(self.size / 2.0)
    }

    /// Strict intersection: boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Bounds) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }

    /// True when `self` lies fully inside the rectangle [min, max]
    pub fn within(&self, min: Vec2, max: Vec2) -> bool {
        let own_max = self.max();
        self.min.x >= min.x - EDGE_TOLERANCE
            && self.min.y >= min.y - EDGE_TOLERANCE
            && own_max.x <= max.x + EDGE_TOLERANCE
            && own_max.y <= max.y + EDGE_TOLERANCE
    }
}

/// Minimum centre distance between two balloons
#[inline]
pub fn min_spacing(a_size: f32, b_size: f32, padding: f32) -> f32 {
    a_size / 2.0 + b_size / 2.0 + padding
}

/// Check a candidate against one placed balloon
pub fn clear_of(candidate: &Bounds, placed: &Bounds, padding: f32) -> bool {
    let spacing = min_spacing(candidate.size, placed.size, padding);
    let far_enough = candidate.center().distance(placed.center()) >= spacing;
    far_enough && !candidate.intersects(placed)
}

/// Check a candidate against every placed balloon
pub fn clear_of_all<'a, I>(candidate: &Bounds, placed: I, padding: f32) -> bool
where
    I: IntoIterator<Item = &'a Bounds>,
{
    placed.into_iter().all(|p| clear_of(candidate, p, padding))
}
