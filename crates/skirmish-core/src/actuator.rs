//! Output side: turning decisions into input.
//!
//! [`Actuator`] is what the agent loop talks to. [`KeyboardActuator`] is the
//! usual implementation: it maps a direction onto the four movement keys and
//! a shot onto a pointer click, driving a host-supplied [`KeyDriver`].
//!
//! # Key Mapping
//!
//! The normalized direction selects at most one horizontal and one vertical
//! key, giving eight headings 45 degrees apart:
//!
//! ```
//! use planar::Vector2;
//! use skirmish_core::actuator::DirectionKeys;
//!
//! assert_eq!(DirectionKeys::from_direction(Vector2::new(1.0, 0.0)), DirectionKeys::RIGHT);
//! assert_eq!(
//!     DirectionKeys::from_direction(Vector2::new(-1.0, -1.0)),
//!     DirectionKeys::LEFT | DirectionKeys::UP
//! );
//! assert!(DirectionKeys::from_direction(Vector2::ZERO).is_empty());
//! ```

use std::f64::consts::PI;
use std::fmt;

use bitflags::bitflags;
use planar::Vector2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Result;

// =============================================================================
// Actuator
// =============================================================================

/// Receives the agent's movement and aim decisions.
///
/// Both calls may be repeated every frame with the same argument.
pub trait Actuator {
    /// Move along `direction`. Only the heading matters; zero means stop.
    ///
    /// # Errors
    ///
    /// [`SkirmishError::Actuator`](crate::error::SkirmishError::Actuator) if
    /// input injection failed.
    fn move_towards(&mut self, direction: Vector2) -> Result<()>;

    /// Fire at `target`, given in capture coordinates.
    ///
    /// # Errors
    ///
    /// [`SkirmishError::Actuator`](crate::error::SkirmishError::Actuator) if
    /// input injection failed.
    fn shoot(&mut self, target: Vector2) -> Result<()>;
}

// =============================================================================
// Direction Keys
// =============================================================================

bitflags! {
    /// Set of held movement keys.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct DirectionKeys: u8 {
        /// Move up (screen y decreasing)
        const UP = 1 << 0;
        /// Move down (screen y increasing)
        const DOWN = 1 << 1;
        /// Move left
        const LEFT = 1 << 2;
        /// Move right
        const RIGHT = 1 << 3;
    }
}

impl DirectionKeys {
    /// Keys to hold to move along `direction`.
    #[must_use]
    pub fn from_direction(direction: Vector2) -> Self {
        let heading = direction.normalize();
        let mut keys = Self::empty();
        if heading.is_zero() {
            return keys;
        }

        if heading.x() > (3.0 * PI / 8.0).cos() {
            keys |= Self::RIGHT;
        } else if heading.x() < (5.0 * PI / 8.0).cos() {
            keys |= Self::LEFT;
        }

        if heading.y() > (PI / 8.0).sin() {
            keys |= Self::DOWN;
        } else if heading.y() < -(PI / 8.0).sin() {
            keys |= Self::UP;
        }
        keys
    }

    /// Unit direction the held keys move in, or zero.
    ///
    /// Opposite keys cancel out.
    #[must_use]
    pub fn to_direction(self) -> Vector2 {
        let mut x = 0.0;
        let mut y = 0.0;
        if self.contains(Self::RIGHT) {
            x += 1.0;
        }
        if self.contains(Self::LEFT) {
            x -= 1.0;
        }
        if self.contains(Self::DOWN) {
            y += 1.0;
        }
        if self.contains(Self::UP) {
            y -= 1.0;
        }
        Vector2::new(x, y).normalize()
    }
}

impl fmt::Display for DirectionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("+"))
        }
    }
}

// =============================================================================
// Keyboard Actuator
// =============================================================================

/// Low-level input injection supplied by the host.
pub trait KeyDriver {
    /// Press a single movement key.
    ///
    /// # Errors
    ///
    /// Host-specific injection failure.
    fn press(&mut self, key: DirectionKeys) -> Result<()>;

    /// Release a single movement key.
    ///
    /// # Errors
    ///
    /// Host-specific injection failure.
    fn release(&mut self, key: DirectionKeys) -> Result<()>;

    /// Move the pointer to `point` (screen coordinates) and press the fire button.
    ///
    /// # Errors
    ///
    /// Host-specific injection failure.
    fn press_pointer(&mut self, point: Vector2) -> Result<()>;

    /// Release the fire button.
    ///
    /// # Errors
    ///
    /// Host-specific injection failure.
    fn release_pointer(&mut self) -> Result<()>;
}

/// [`Actuator`] driving movement keys and a pointer.
///
/// Keys are only touched when the normalized direction changes, so calling
/// `move_towards` with the same direction every frame is free.
#[derive(Debug)]
pub struct KeyboardActuator<D: KeyDriver> {
    driver: D,
    /// Screen position of the capture's top-left corner.
    origin: Vector2,
    /// Last normalized direction.
    direction: Vector2,
    held: DirectionKeys,
}

impl<D: KeyDriver> KeyboardActuator<D> {
    /// Create an actuator for a capture whose top-left sits at `origin` on screen.
    #[must_use]
    pub fn new(driver: D, origin: Vector2) -> Self {
        Self {
            driver,
            origin,
            direction: Vector2::ZERO,
            held: DirectionKeys::empty(),
        }
    }

    /// Keys currently held.
    #[must_use]
    pub const fn held(&self) -> DirectionKeys {
        self.held
    }

    /// The last normalized direction requested.
    #[must_use]
    pub const fn direction(&self) -> Vector2 {
        self.direction
    }

    /// The wrapped driver.
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Release every held key.
    ///
    /// # Errors
    ///
    /// Propagates driver failures.
    pub fn release_all(&mut self) -> Result<()> {
        for key in self.held.iter() {
            self.driver.release(key)?;
        }
        self.held = DirectionKeys::empty();
        self.direction = Vector2::ZERO;
        Ok(())
    }
}

impl<D: KeyDriver> Actuator for KeyboardActuator<D> {
    fn move_towards(&mut self, direction: Vector2) -> Result<()> {
        let heading = direction.normalize();
        if heading == self.direction {
            return Ok(());
        }

        self.release_all()?;
        self.direction = heading;

        let keys = DirectionKeys::from_direction(heading);
        for key in keys.iter() {
            self.driver.press(key)?;
        }
        self.held = keys;
        trace!(%keys, %heading, "movement keys changed");
        Ok(())
    }

    fn shoot(&mut self, target: Vector2) -> Result<()> {
        self.driver.press_pointer(self.origin + target)?;
        self.driver.release_pointer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingDriver {
        log: Vec<String>,
    }

    impl KeyDriver for RecordingDriver {
        fn press(&mut self, key: DirectionKeys) -> Result<()> {
            self.log.push(format!("press {key}"));
            Ok(())
        }

        fn release(&mut self, key: DirectionKeys) -> Result<()> {
            self.log.push(format!("release {key}"));
            Ok(())
        }

        fn press_pointer(&mut self, point: Vector2) -> Result<()> {
            self.log.push(format!("click {point}"));
            Ok(())
        }

        fn release_pointer(&mut self) -> Result<()> {
            self.log.push("unclick".to_string());
            Ok(())
        }
    }

    mod mapping_tests {
        use super::*;

        #[test]
        fn cardinal_directions() {
            assert_eq!(DirectionKeys::from_direction(Vector2::new(0.0, -5.0)), DirectionKeys::UP);
            assert_eq!(DirectionKeys::from_direction(Vector2::new(0.0, 5.0)), DirectionKeys::DOWN);
            assert_eq!(DirectionKeys::from_direction(Vector2::new(-5.0, 0.0)), DirectionKeys::LEFT);
        }

        #[test]
        fn diagonals() {
            assert_eq!(
                DirectionKeys::from_direction(Vector2::new(1.0, 1.0)),
                DirectionKeys::RIGHT | DirectionKeys::DOWN
            );
        }

        #[test]
        fn near_vertical_is_single_key() {
            // 0.3/1.044 is below cos(3pi/8) ~ 0.383
            assert_eq!(DirectionKeys::from_direction(Vector2::new(0.3, 1.0)), DirectionKeys::DOWN);
        }

        #[test]
        fn keys_back_to_direction() {
            assert_eq!(DirectionKeys::RIGHT.to_direction(), Vector2::new(1.0, 0.0));
            assert_eq!((DirectionKeys::LEFT | DirectionKeys::RIGHT).to_direction(), Vector2::ZERO);
            let diag = (DirectionKeys::UP | DirectionKeys::LEFT).to_direction();
            assert_eq!(diag, Vector2::new(-0.7071, -0.7071));
        }

        #[test]
        fn display_names() {
            assert_eq!((DirectionKeys::DOWN | DirectionKeys::RIGHT).to_string(), "DOWN+RIGHT");
            assert_eq!(DirectionKeys::empty().to_string(), "none");
        }
    }

    mod keyboard_tests {
        use super::*;

        #[test]
        fn presses_once_per_direction() {
            let mut actuator = KeyboardActuator::new(RecordingDriver::default(), Vector2::ZERO);
            actuator.move_towards(Vector2::new(10.0, 0.0)).unwrap();
            actuator.move_towards(Vector2::new(200.0, 0.0)).unwrap();
            assert_eq!(actuator.driver().log, vec!["press RIGHT"]);
            assert_eq!(actuator.held(), DirectionKeys::RIGHT);
        }

        #[test]
        fn direction_change_releases_first() {
            let mut actuator = KeyboardActuator::new(RecordingDriver::default(), Vector2::ZERO);
            actuator.move_towards(Vector2::new(1.0, 0.0)).unwrap();
            actuator.move_towards(Vector2::new(0.0, -1.0)).unwrap();
            assert_eq!(
                actuator.driver().log,
                vec!["press RIGHT", "release RIGHT", "press UP"]
            );
        }

        #[test]
        fn zero_direction_stops() {
            let mut actuator = KeyboardActuator::new(RecordingDriver::default(), Vector2::ZERO);
            actuator.move_towards(Vector2::new(1.0, 1.0)).unwrap();
            actuator.move_towards(Vector2::ZERO).unwrap();
            assert!(actuator.held().is_empty());
            assert_eq!(actuator.direction(), Vector2::ZERO);
            assert_eq!(
                actuator.driver().log,
                vec!["press DOWN", "press RIGHT", "release DOWN", "release RIGHT"]
            );
        }

        #[test]
        fn shoot_offsets_by_origin() {
            let mut actuator = KeyboardActuator::new(RecordingDriver::default(), Vector2::new(100.0, 50.0));
            actuator.shoot(Vector2::new(55.0, 5.0)).unwrap();
            assert_eq!(actuator.driver().log, vec!["click Vector2(155,55)", "unclick"]);
        }
    }
}
