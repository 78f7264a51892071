//! Agent configuration.
//!
//! All options have defaults, so a config file only needs to name what it
//! changes:
//!
//! ```
//! use skirmish_core::config::AgentConfig;
//!
//! let config = AgentConfig::from_json_str(r#"{ "perception": { "detect_rate": 5 }, "seed": 7 }"#)
//!     .unwrap();
//! assert_eq!(config.perception.detect_rate, 5);
//! assert_eq!(config.perception.min_object_area, 500.0);
//! assert_eq!(config.seed, Some(7));
//! ```

use std::fs;
use std::path::Path;

use planar::Extent;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SkirmishError};

// =============================================================================
// Sections
// =============================================================================

/// Perception pipeline options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Contours smaller than this many square pixels are ignored by detectors
    pub min_object_area: f64,
    /// Run full detection every this many frames; zero or negative disables it
    pub detect_rate: i32,
    /// Padding added around a box before seeding its tracker
    pub tracking_padding: Extent,
    /// Size of the box used to pick out the player at startup
    pub player_search_size: Extent,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            min_object_area: 500.0,
            detect_rate: 15,
            tracking_padding: Extent::square(20.0),
            player_search_size: Extent::square(100.0),
        }
    }
}

/// Obstacle avoidance options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Magnitude of the undeflected desired direction
    pub direction_force: f64,
    /// Distance ahead of the player at which the forward sensing circle sits
    pub sight_offset: f64,
    /// Radius of both sensing circles
    pub max_see_ahead: f64,
    /// Exponential decay of the repulsive force with distance
    pub avoidance_factor: f64,
    /// Repulsive force at zero distance, before the floor is added
    pub max_avoidance_force: f64,
    /// Repulsive force floor
    pub min_avoidance_force: f64,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            direction_force: 200.0,
            sight_offset: 70.0,
            max_see_ahead: 80.0,
            avoidance_factor: 0.02,
            max_avoidance_force: 1300.0,
            min_avoidance_force: 1.0,
        }
    }
}

/// Behavior state machine options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Per-frame probability that the wander heading is resampled
    pub direction_change_chance: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            direction_change_chance: 0.01,
        }
    }
}

// =============================================================================
// AgentConfig
// =============================================================================

/// Top-level agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Size of the captured view in pixels
    pub capture_size: Extent,
    /// Perception options
    pub perception: PerceptionConfig,
    /// Steering options
    pub steering: SteeringConfig,
    /// Behavior options
    pub behavior: BehaviorConfig,
    /// RNG seed for exploration; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            capture_size: Extent::new(800.0, 400.0),
            perception: PerceptionConfig::default(),
            steering: SteeringConfig::default(),
            behavior: BehaviorConfig::default(),
            seed: None,
        }
    }
}

impl AgentConfig {
    /// Default config with a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Default config for a different capture size.
    #[must_use]
    pub fn with_capture_size(width: f64, height: f64) -> Self {
        Self {
            capture_size: Extent::new(width, height),
            ..Default::default()
        }
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// [`SkirmishError::ConfigParse`] on malformed JSON,
    /// [`SkirmishError::InvalidConfig`] if a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// [`SkirmishError::Io`] if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// [`SkirmishError::ConfigParse`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every option is in range.
    ///
    /// # Errors
    ///
    /// [`SkirmishError::InvalidConfig`] naming the first offending option.
    pub fn validate(&self) -> Result<()> {
        if !self.capture_size.is_positive() {
            return Err(SkirmishError::invalid_config(
                "capture_size must be positive in both dimensions",
            ));
        }

        let p = &self.perception;
        non_negative("perception.min_object_area", p.min_object_area)?;
        if !p.tracking_padding.is_non_negative() {
            return Err(SkirmishError::invalid_config(
                "perception.tracking_padding must not be negative",
            ));
        }
        if !p.player_search_size.is_positive() {
            return Err(SkirmishError::invalid_config(
                "perception.player_search_size must be positive",
            ));
        }

        let s = &self.steering;
        positive("steering.direction_force", s.direction_force)?;
        non_negative("steering.sight_offset", s.sight_offset)?;
        positive("steering.max_see_ahead", s.max_see_ahead)?;
        non_negative("steering.avoidance_factor", s.avoidance_factor)?;
        positive("steering.max_avoidance_force", s.max_avoidance_force)?;
        positive("steering.min_avoidance_force", s.min_avoidance_force)?;

        let chance = self.behavior.direction_change_chance;
        if !(0.0..=1.0).contains(&chance) {
            return Err(SkirmishError::invalid_config(format!(
                "behavior.direction_change_chance must be within [0, 1], got {chance}"
            )));
        }

        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SkirmishError::invalid_config(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SkirmishError::invalid_config(format!(
            "{name} must not be negative, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod default_tests {
        use super::*;

        #[test]
        fn defaults_are_valid() {
            let config = AgentConfig::default();
            assert!(config.validate().is_ok());
            assert_eq!(config.capture_size, Extent::new(800.0, 400.0));
            assert_eq!(config.perception.detect_rate, 15);
            assert_eq!(config.perception.tracking_padding, Extent::square(20.0));
            assert_eq!(config.steering.max_see_ahead, 80.0);
            assert_eq!(config.behavior.direction_change_chance, 0.01);
            assert_eq!(config.seed, None);
        }

        #[test]
        fn with_constructors() {
            assert_eq!(AgentConfig::with_seed(3).seed, Some(3));
            let c = AgentConfig::with_capture_size(640.0, 480.0);
            assert_eq!(c.capture_size, Extent::new(640.0, 480.0));
            assert_eq!(c.perception, PerceptionConfig::default());
        }
    }

    mod json_tests {
        use super::*;

        #[test]
        fn empty_object_gives_defaults() {
            let config = AgentConfig::from_json_str("{}").unwrap();
            assert_eq!(config, AgentConfig::default());
        }

        #[test]
        fn roundtrip_pretty() {
            let config = AgentConfig::with_seed(99);
            let json = config.to_json_pretty().unwrap();
            assert_eq!(AgentConfig::from_json_str(&json).unwrap(), config);
        }

        #[test]
        fn malformed_json_is_parse_error() {
            let err = AgentConfig::from_json_str("{ not json").unwrap_err();
            assert!(matches!(err, SkirmishError::ConfigParse(_)));
        }

        #[test]
        fn missing_file_is_io_error() {
            let err = AgentConfig::load("/definitely/not/here.json").unwrap_err();
            assert!(matches!(err, SkirmishError::Io(_)));
        }

        #[test]
        fn out_of_range_rejected_at_load() {
            let err =
                AgentConfig::from_json_str(r#"{ "behavior": { "direction_change_chance": 1.5 } }"#)
                    .unwrap_err();
            assert!(matches!(err, SkirmishError::InvalidConfig(_)));
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn rejects_zero_capture() {
            let mut c = AgentConfig::default();
            c.capture_size = Extent::new(0.0, 400.0);
            assert!(c.validate().is_err());
        }

        #[test]
        fn rejects_negative_padding() {
            let mut c = AgentConfig::default();
            c.perception.tracking_padding = Extent::new(-1.0, 20.0);
            assert!(c.validate().is_err());
        }

        #[test]
        fn rejects_non_positive_radius_and_forces() {
            let mut c = AgentConfig::default();
            c.steering.max_see_ahead = 0.0;
            assert!(c.validate().is_err());

            let mut c = AgentConfig::default();
            c.steering.min_avoidance_force = -1.0;
            assert!(c.validate().is_err());

            let mut c = AgentConfig::default();
            c.steering.max_avoidance_force = f64::NAN;
            assert!(c.validate().is_err());
        }

        #[test]
        fn non_positive_detect_rate_is_allowed() {
            let mut c = AgentConfig::default();
            c.perception.detect_rate = 0;
            assert!(c.validate().is_ok());
            c.perception.detect_rate = -3;
            assert!(c.validate().is_ok());
        }

        #[test]
        fn probability_bounds_inclusive() {
            let mut c = AgentConfig::default();
            c.behavior.direction_change_chance = 0.0;
            assert!(c.validate().is_ok());
            c.behavior.direction_change_chance = 1.0;
            assert!(c.validate().is_ok());
            c.behavior.direction_change_chance = -0.1;
            assert!(c.validate().is_err());
        }
    }
}
