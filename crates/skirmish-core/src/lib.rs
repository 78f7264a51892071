//! # Skirmish Core
//!
//! Decision engine for an agent playing a top-down shape-shooting arena game
//! from screen captures.
//!
//! The crate never touches pixels or input devices. Capture, detection,
//! tracking and input injection are capabilities supplied by the host
//! through the traits in [`perception`] and [`actuator`]; the core keeps the
//! world model current and decides what to do with it.
//!
//! ## Architecture
//!
//! - **World** ([`world`]): the player plus every perceived entity
//! - **Perception** ([`perception`]): periodic full detection, per-entity
//!   tracking between detections, crop-and-redetect when a tracker drops out
//! - **Ranking** ([`ranking`]): stable merge sort and importance score
//! - **Steering** ([`steering`]): obstacle avoidance with two sensing circles
//! - **Behavior** ([`behavior`]): Explore/Target state machine
//! - **Agent** ([`agent`]): the acquire, perceive, decide, actuate loop
//!
//! ## Usage
//!
//! ```rust,ignore
//! use skirmish_core::{Agent, AgentConfig};
//!
//! let config = AgentConfig::load("agent.json")?;
//! let mut agent = Agent::new(config, Box::new(detector), Box::new(trackers))?;
//! agent.initialize(&first_frame, view_center);
//! let stats = agent.run(&mut source, &mut actuator, None, |_| stop.is_set())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export the geometry kernel
pub use planar;

pub mod actuator;
pub mod agent;
pub mod behavior;
pub mod classify;
pub mod config;
pub mod entity;
pub mod error;
pub mod perception;
pub mod ranking;
pub mod steering;
pub mod world;

#[cfg(test)]
mod tests;

pub use actuator::{Actuator, DirectionKeys, KeyDriver, KeyboardActuator};
pub use agent::{Agent, FrameOutcome, LoopStats, TickOutcome};
pub use behavior::{Behavior, BehaviorState, Command};
pub use config::{AgentConfig, BehaviorConfig, PerceptionConfig, SteeringConfig};
pub use entity::{Entity, EntityTag};
pub use error::{Result, SkirmishError};
pub use perception::{
    DetectRequest, Detector, Frame, FrameSource, Perception, PerceptionReport, Tracker, TrackerFactory,
    TrackerRole,
};
pub use world::World;
