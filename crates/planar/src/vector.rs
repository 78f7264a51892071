//! Rounded 2D vector.
//!
//! Screen coordinates coming out of detection and tracking are noisy floats.
//! [`Vector2`] rounds both components to a fixed number of decimal places on
//! construction, so two vectors computed along different paths compare equal
//! when they agree to that precision.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::bbox::Corners;
use crate::round_to;

/// Number of decimal places kept by [`Vector2::new`].
pub const DEFAULT_PRECISION: u8 = 4;

fn default_precision() -> u8 {
    DEFAULT_PRECISION
}

/// A 2D point or direction with rounded components.
///
/// Vectors are immutable by convention: every operation returns a new value.
/// The `set_*` methods exist for callers that keep a vector as state (the
/// wander heading, for example) and are thin wrappers over the `with_*`
/// variants.
///
/// # Equality
///
/// Two vectors are equal when their rounded components are equal. The
/// precision itself does not take part in the comparison.
///
/// # Example
///
/// ```
/// use planar::Vector2;
///
/// let a = Vector2::new(0.123_44, 1.0);
/// let b = Vector2::new(0.123_41, 1.0);
/// assert_eq!(a, b);
///
/// let unit = Vector2::new(3.0, 4.0).normalize();
/// assert_eq!(unit, Vector2::new(0.6, 0.8));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vector2 {
    x: f64,
    y: f64,
    #[serde(default = "default_precision")]
    precision: u8,
}

impl Vector2 {
    /// The zero vector at the default precision.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        precision: DEFAULT_PRECISION,
    };

    /// Create a vector rounded to [`DEFAULT_PRECISION`] decimal places.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self::with_precision(x, y, DEFAULT_PRECISION)
    }

    /// Create a vector rounded to `precision` decimal places.
    #[must_use]
    pub fn with_precision(x: f64, y: f64, precision: u8) -> Self {
        Self {
            x: round_to(x, precision),
            y: round_to(y, precision),
            precision,
        }
    }

    /// Create a vector with the same precision as `self`.
    fn sibling(&self, x: f64, y: f64) -> Self {
        Self::with_precision(x, y, self.precision)
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical component (screen space: grows downwards).
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Number of decimal places this vector is rounded to.
    #[must_use]
    pub const fn precision(&self) -> u8 {
        self.precision
    }

    /// The unrounded `glam` representation.
    #[must_use]
    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Magnitude, rounded to this vector's precision.
    #[must_use]
    pub fn length(&self) -> f64 {
        round_to(self.as_dvec2().length(), self.precision)
    }

    /// Squared magnitude. Not rounded.
    #[must_use]
    pub fn length_squared(&self) -> f64 {
        self.as_dvec2().length_squared()
    }

    /// Returns `true` if both components are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Unit vector in the same direction.
    ///
    /// The zero vector normalizes to itself rather than to NaN.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let magnitude = self.as_dvec2().length();
        if magnitude == 0.0 {
            return self.sibling(0.0, 0.0);
        }
        self.sibling(self.x / magnitude, self.y / magnitude)
    }

    /// Copy of this vector with its magnitude set to `length`.
    ///
    /// A negative length flips the direction. The zero vector stays zero.
    #[must_use]
    pub fn with_length(&self, length: f64) -> Self {
        let unit = self.normalize();
        self.sibling(unit.x * length, unit.y * length)
    }

    /// Set the magnitude in place, keeping the direction.
    pub fn set_length(&mut self, length: f64) {
        *self = self.with_length(length);
    }

    /// Copy of this vector scaled by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        self.with_length(self.length() * factor)
    }

    /// Angle in radians measured from the positive x axis, rounded.
    #[must_use]
    pub fn angle(&self) -> f64 {
        round_to(self.y.atan2(self.x), self.precision)
    }

    /// Copy of this vector pointing at `angle` radians, keeping its magnitude.
    #[must_use]
    pub fn with_angle(&self, angle: f64) -> Self {
        let length = self.as_dvec2().length();
        self.sibling(length * angle.cos(), length * angle.sin())
    }

    /// Point the vector at `angle` radians in place, keeping its magnitude.
    pub fn set_angle(&mut self, angle: f64) {
        *self = self.with_angle(angle);
    }

    /// Copy of this vector rotated by `angle` radians.
    #[must_use]
    pub fn rotated(&self, angle: f64) -> Self {
        self.with_angle(self.angle() + angle)
    }

    /// Euclidean distance to `other`, rounded to this vector's precision.
    #[must_use]
    pub fn distance_to(&self, other: Vector2) -> f64 {
        round_to(self.distance_squared(other).sqrt(), self.precision)
    }

    /// Squared distance to `other`. Not rounded.
    #[must_use]
    pub fn distance_squared(&self, other: Vector2) -> f64 {
        self.as_dvec2().distance_squared(other.as_dvec2())
    }

    /// Whether the point lies strictly inside the rectangle given by `corners`.
    #[must_use]
    pub fn inside_rect(&self, corners: &Corners) -> bool {
        self.x > corners.x1 && self.x < corners.x2 && self.y > corners.y1 && self.y < corners.y2
    }

    /// Integer pixel coordinates, truncated towards zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_pixel(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

impl Default for Vector2 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Vector2 {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector2({},{})", self.x, self.y)
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        self.sibling(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        *self = *self + rhs;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        self.sibling(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        self.sibling(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, factor: f64) -> Vector2 {
        self.scaled(factor)
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<DVec2> for Vector2 {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for DVec2 {
    fn from(v: Vector2) -> Self {
        v.as_dvec2()
    }
}
