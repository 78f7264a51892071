//! # Planar
//!
//! Small 2D geometry kernel used by the Skirmish agent to reason about what it
//! sees on screen.
//!
//! Everything here is a plain value type:
//!
//! - [`Vector2`]: point/direction with coordinates rounded to a fixed decimal
//!   precision so equality and comparisons stay stable frame to frame
//! - [`BBox`]: axis-aligned box in `(x, y, width, height)` form
//! - [`Segment`]: line segment with orientation-based intersection tests
//! - [`Circle`]: sensing circle that can be tested against a [`BBox`]
//!
//! ## Quick Start
//!
//! ```
//! use planar::{BBox, Circle, Vector2};
//!
//! let obstacle = BBox::new(20.0, 0.0, 10.0, 10.0);
//! let sight = Circle::new(Vector2::new(0.0, 0.0), 80.0);
//!
//! assert!(sight.intersects_rect(&obstacle));
//! assert_eq!(obstacle.center(), Vector2::new(25.0, 5.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bbox;
pub mod circle;
pub mod segment;
pub mod vector;

// Re-exports for convenience
pub use bbox::{BBox, Corners};
pub use circle::Circle;
pub use segment::{Orientation, Segment};
pub use vector::{Vector2, DEFAULT_PRECISION};

use serde::{Deserialize, Serialize};

/// Rounds `value` to `digits` decimal places.
///
/// Halfway cases round away from zero.
///
/// # Example
///
/// ```
/// assert_eq!(planar::round_to(1.23456, 4), 1.2346);
/// assert_eq!(planar::round_to(-0.5, 0), -1.0);
/// ```
#[must_use]
pub fn round_to(value: f64, digits: u8) -> f64 {
    let scale = 10f64.powi(i32::from(digits));
    (value * scale).round() / scale
}

/// Width/height pair used for capture sizes, tracker padding and search areas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    /// Horizontal size
    pub width: f64,
    /// Vertical size
    pub height: f64,
}

impl Extent {
    /// Create an extent from its two sides.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Create a square extent.
    #[must_use]
    pub const fn square(side: f64) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    /// Center point of a region of this size anchored at the origin.
    #[must_use]
    pub fn center(&self) -> Vector2 {
        Vector2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether both sides are strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Whether neither side is negative.
    #[must_use]
    pub fn is_non_negative(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }
}
