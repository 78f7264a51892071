//! # Skirmish Sim
//!
//! A synthetic arena that implements every capability the agent core needs,
//! so the full acquire, perceive, decide, actuate loop can run without a
//! screen or input devices.
//!
//! - [`scene`]: the arena, its shapes and the player
//! - [`frame`]: rendered frames and their sprites
//! - [`capabilities`]: detector, trackers, frame source and key driver
//! - [`runner`]: seeded headless episodes and parallel batches
//!
//! ## Quick Start
//!
//! ```
//! use skirmish_sim::runner::{run_headless, SimConfig};
//!
//! let summary = run_headless(&SimConfig::default(), 7, 60).unwrap();
//! assert_eq!(summary.stats.frames_processed, 60);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod capabilities;
pub mod frame;
pub mod runner;
pub mod scene;

pub use capabilities::{scene_actuator, SceneActuator, SceneDetector, SceneSource, SceneTracker, SceneTrackerFactory};
pub use frame::{SceneFrame, Sprite};
pub use runner::{run_batch, run_headless, RunSummary, SimConfig};
pub use scene::{Scene, SceneConfig, Shape};
