//! Axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

use crate::{Extent, Vector2};

/// Corner-pair form of a box: `(x1, y1)` top-left, `(x2, y2)` bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corners {
    /// Left edge
    pub x1: f64,
    /// Top edge
    pub y1: f64,
    /// Right edge
    pub x2: f64,
    /// Bottom edge
    pub y2: f64,
}

impl Corners {
    /// Create from the two corners.
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

/// Box in `(x, y, width, height)` form with the origin at the top-left.
///
/// Width and height are clamped to be non-negative when the box is built,
/// so every `BBox` has a well defined area.
///
/// # Example
///
/// ```
/// use planar::{BBox, Extent};
///
/// let b = BBox::new(10.0, 10.0, 20.0, 20.0);
/// let padded = b.expanded(Extent::square(5.0));
/// assert_eq!(padded, BBox::new(5.0, 5.0, 30.0, 30.0));
/// assert_eq!(padded.shrunk(Extent::square(5.0)), b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl BBox {
    /// Create a box, clamping negative sizes to zero.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Create a box of `size` centred on `center`.
    #[must_use]
    pub fn from_center(center: Vector2, size: Extent) -> Self {
        Self::new(
            center.x() - size.width / 2.0,
            center.y() - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    /// Create a box spanning two corners.
    #[must_use]
    pub fn from_corners(corners: Corners) -> Self {
        Self::new(
            corners.x1,
            corners.y1,
            corners.x2 - corners.x1,
            corners.y2 - corners.y1,
        )
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Width (never negative).
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Height (never negative).
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Size as an [`Extent`].
    #[must_use]
    pub const fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vector2 {
        Vector2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corner-pair form.
    #[must_use]
    pub fn corners(&self) -> Corners {
        Corners::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Area in square pixels.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether the box covers no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Box with both corners truncated to whole pixels.
    #[must_use]
    pub fn snapped(&self) -> Self {
        let c = self.corners();
        Self::from_corners(Corners::new(
            c.x1.trunc(),
            c.y1.trunc(),
            c.x2.trunc(),
            c.y2.trunc(),
        ))
    }

    /// Box grown by `buffer` on every side.
    #[must_use]
    pub fn expanded(&self, buffer: Extent) -> Self {
        Self::new(
            self.x - buffer.width,
            self.y - buffer.height,
            self.width + 2.0 * buffer.width,
            self.height + 2.0 * buffer.height,
        )
    }

    /// Box shrunk by `buffer` on every side. Sizes bottom out at zero.
    #[must_use]
    pub fn shrunk(&self, buffer: Extent) -> Self {
        Self::new(
            self.x + buffer.width,
            self.y + buffer.height,
            self.width - 2.0 * buffer.width,
            self.height - 2.0 * buffer.height,
        )
    }

    /// Box moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vector2) -> Self {
        Self::new(
            self.x + offset.x(),
            self.y + offset.y(),
            self.width,
            self.height,
        )
    }

    /// Whether two boxes share interior area. Touching edges do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &BBox) -> bool {
        let a = self.corners();
        let b = other.corners();
        a.x1 < b.x2 && b.x1 < a.x2 && a.y1 < b.y2 && b.y1 < a.y2
    }

    /// Intersection of two boxes, or `None` if they do not overlap.
    #[must_use]
    pub fn intersection(&self, other: &BBox) -> Option<BBox> {
        if !self.overlaps(other) {
            return None;
        }
        let a = self.corners();
        let b = other.corners();
        Some(Self::from_corners(Corners::new(
            a.x1.max(b.x1),
            a.y1.max(b.y1),
            a.x2.min(b.x2),
            a.y2.min(b.y2),
        )))
    }

    /// Clamp the box into a frame of `frame` size anchored at the origin.
    ///
    /// The result may be empty if the box lies completely outside.
    #[must_use]
    pub fn fit_within(&self, frame: Extent) -> Self {
        let c = self.corners();
        let x1 = c.x1.clamp(0.0, frame.width);
        let y1 = c.y1.clamp(0.0, frame.height);
        let x2 = c.x2.clamp(0.0, frame.width);
        let y2 = c.y2.clamp(0.0, frame.height);
        Self::from_corners(Corners::new(x1, y1, x2, y2))
    }
}
