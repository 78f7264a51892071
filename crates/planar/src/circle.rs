//! Sensing circles.

use serde::{Deserialize, Serialize};

use crate::{BBox, Vector2};

/// Circle given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center point
    pub center: Vector2,
    /// Radius (expected non-negative)
    pub radius: f64,
}

impl Circle {
    /// Create a circle.
    #[must_use]
    pub const fn new(center: Vector2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Whether `point` lies inside or on the circle.
    #[must_use]
    pub fn contains(&self, point: Vector2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Whether the circle touches or overlaps `rect`.
    ///
    /// The center is clamped onto the box per axis; the clamped point is the
    /// closest point of the box, so the test reduces to a squared distance
    /// comparison.
    #[must_use]
    pub fn intersects_rect(&self, rect: &BBox) -> bool {
        let c = rect.corners();
        let cx = self.center.x();
        let cy = self.center.y();
        let dx = cx - cx.clamp(c.x1, c.x2);
        let dy = cy - cy.clamp(c.y1, c.y2);
        dx * dx + dy * dy <= self.radius * self.radius
    }
}
