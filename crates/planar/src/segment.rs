//! Line segments and orientation tests.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{round_to, BBox, Vector2};

/// Turn direction of an ordered point triple `(p, q, r)` in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// The three points lie on a line
    Collinear,
    /// `p -> q -> r` turns clockwise
    Clockwise,
    /// `p -> q -> r` turns counter-clockwise
    CounterClockwise,
}

impl Orientation {
    /// Orientation of the triple `(p, q, r)`.
    #[must_use]
    pub fn of(p: Vector2, q: Vector2, r: Vector2) -> Self {
        let val = (q.y() - p.y()) * (r.x() - q.x()) - (q.x() - p.x()) * (r.y() - q.y());
        if val > 0.0 {
            Orientation::Clockwise
        } else if val < 0.0 {
            Orientation::CounterClockwise
        } else {
            Orientation::Collinear
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Collinear => write!(f, "Collinear"),
            Orientation::Clockwise => write!(f, "Clockwise"),
            Orientation::CounterClockwise => write!(f, "CounterClockwise"),
        }
    }
}

/// Segment between two endpoints.
///
/// # Example
///
/// ```
/// use planar::{BBox, Segment, Vector2};
///
/// let ray = Segment::new(Vector2::new(0.0, 5.0), Vector2::new(100.0, 5.0));
/// assert!(ray.intersects_rect(&BBox::new(20.0, 0.0, 10.0, 10.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start point
    pub p: Vector2,
    /// End point
    pub q: Vector2,
}

/// Whether `q` lies within the bounding rectangle of `p` and `r`.
///
/// Only meaningful when the three points are collinear.
fn on_segment(p: Vector2, q: Vector2, r: Vector2) -> bool {
    q.x() <= p.x().max(r.x())
        && q.x() >= p.x().min(r.x())
        && q.y() <= p.y().max(r.y())
        && q.y() >= p.y().min(r.y())
}

impl Segment {
    /// Create a segment from its endpoints.
    #[must_use]
    pub const fn new(p: Vector2, q: Vector2) -> Self {
        Self { p, q }
    }

    /// Segment from `tail` along `vector`.
    #[must_use]
    pub fn from_vector(vector: Vector2, tail: Vector2) -> Self {
        Self::new(tail, tail + vector)
    }

    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.p.distance_to(self.q)
    }

    /// The segment as a vector from `p` to `q`.
    #[must_use]
    pub fn as_vector(&self) -> Vector2 {
        self.q - self.p
    }

    /// Whether two segments intersect, endpoints included.
    #[must_use]
    pub fn intersects(&self, other: &Segment) -> bool {
        let (p1, q1, p2, q2) = (self.p, self.q, other.p, other.q);

        let o1 = Orientation::of(p1, q1, p2);
        let o2 = Orientation::of(p1, q1, q2);
        let o3 = Orientation::of(p2, q2, p1);
        let o4 = Orientation::of(p2, q2, q1);

        if o1 != o2 && o3 != o4 {
            return true;
        }

        // Collinear special cases
        (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
            || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
            || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
            || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
    }

    /// The four edges of `rect`: top, right, bottom, left.
    #[must_use]
    pub fn edges(rect: &BBox) -> [Segment; 4] {
        let c = rect.corners();
        let tl = Vector2::new(c.x1, c.y1);
        let tr = Vector2::new(c.x2, c.y1);
        let br = Vector2::new(c.x2, c.y2);
        let bl = Vector2::new(c.x1, c.y2);
        [
            Segment::new(tl, tr),
            Segment::new(tr, br),
            Segment::new(br, bl),
            Segment::new(bl, tl),
        ]
    }

    /// Whether the segment crosses any edge of `rect` or lies fully inside it.
    #[must_use]
    pub fn intersects_rect(&self, rect: &BBox) -> bool {
        if Self::edges(rect).iter().any(|edge| self.intersects(edge)) {
            return true;
        }
        let corners = rect.corners();
        self.p.inside_rect(&corners) && self.q.inside_rect(&corners)
    }

    /// Whether `point` lies on this segment, within one digit less than the
    /// start point's precision.
    #[must_use]
    pub fn passes_through(&self, point: Vector2) -> bool {
        let precision = self.p.precision().saturating_sub(1);
        let detour = self.p.distance_to(self.q) - self.p.distance_to(point) - self.q.distance_to(point);
        round_to(detour, precision) == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Vector2::new(x1, y1), Vector2::new(x2, y2))
    }

    mod orientation_tests {
        use super::*;

        #[test]
        fn orientation_cases() {
            let p = Vector2::new(0.0, 0.0);
            let q = Vector2::new(4.0, 4.0);
            assert_eq!(Orientation::of(p, q, Vector2::new(1.0, 2.0)), Orientation::CounterClockwise);
            assert_eq!(Orientation::of(p, q, Vector2::new(2.0, 1.0)), Orientation::Clockwise);
            assert_eq!(Orientation::of(p, q, Vector2::new(8.0, 8.0)), Orientation::Collinear);
        }
    }

    mod intersect_tests {
        use super::*;

        #[test]
        fn crossing_segments() {
            assert!(seg(0.0, 0.0, 10.0, 10.0).intersects(&seg(0.0, 10.0, 10.0, 0.0)));
        }

        #[test]
        fn parallel_segments() {
            assert!(!seg(0.0, 0.0, 10.0, 0.0).intersects(&seg(0.0, 1.0, 10.0, 1.0)));
        }

        #[test]
        fn collinear_overlapping() {
            assert!(seg(0.0, 0.0, 10.0, 0.0).intersects(&seg(5.0, 0.0, 15.0, 0.0)));
        }

        #[test]
        fn collinear_disjoint() {
            assert!(!seg(0.0, 0.0, 4.0, 0.0).intersects(&seg(5.0, 0.0, 15.0, 0.0)));
        }

        #[test]
        fn touching_endpoint_counts() {
            assert!(seg(0.0, 0.0, 5.0, 5.0).intersects(&seg(5.0, 5.0, 10.0, 0.0)));
        }

        #[test]
        fn from_vector_starts_at_tail() {
            let s = Segment::from_vector(Vector2::new(3.0, 4.0), Vector2::new(1.0, 1.0));
            assert_eq!(s.q, Vector2::new(4.0, 5.0));
            assert_eq!(s.length(), 5.0);
        }
    }

    mod rect_tests {
        use super::*;

        #[test]
        fn crosses_rect() {
            let rect = BBox::new(20.0, 0.0, 10.0, 10.0);
            assert!(seg(0.0, 5.0, 100.0, 5.0).intersects_rect(&rect));
        }

        #[test]
        fn inside_rect() {
            let rect = BBox::new(0.0, 0.0, 100.0, 100.0);
            assert!(seg(10.0, 10.0, 20.0, 20.0).intersects_rect(&rect));
        }

        #[test]
        fn misses_rect() {
            let rect = BBox::new(20.0, 20.0, 10.0, 10.0);
            assert!(!seg(0.0, 0.0, 10.0, 0.0).intersects_rect(&rect));
        }

        #[test]
        fn touching_edge_counts() {
            let rect = BBox::new(10.0, 0.0, 10.0, 10.0);
            assert!(seg(0.0, 5.0, 10.0, 5.0).intersects_rect(&rect));
        }
    }

    mod passes_through_tests {
        use super::*;

        #[test]
        fn midpoint_is_on_segment() {
            assert!(seg(0.0, 0.0, 10.0, 0.0).passes_through(Vector2::new(5.0, 0.0)));
        }

        #[test]
        fn offset_point_is_not() {
            assert!(!seg(0.0, 0.0, 10.0, 0.0).passes_through(Vector2::new(5.0, 1.0)));
        }

        #[test]
        fn point_past_end_is_not() {
            assert!(!seg(0.0, 0.0, 10.0, 0.0).passes_through(Vector2::new(12.0, 0.0)));
        }
    }
}
