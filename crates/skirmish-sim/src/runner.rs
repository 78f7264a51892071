//! Headless episodes: wire a scene to an agent and run it.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use skirmish_core::agent::{Agent, LoopStats};
use skirmish_core::config::AgentConfig;
use skirmish_core::error::Result;
use tracing::info;

use crate::capabilities::{scene_actuator, SceneDetector, SceneSource, SceneTrackerFactory};
use crate::scene::{Scene, SceneConfig};

/// Mixed into the run seed for the detector's RNG stream.
const DETECTOR_STREAM: u64 = 0x5EED_DE7E_C70B_0001;
/// Mixed into the run seed for the tracker factory's RNG stream.
const TRACKER_STREAM: u64 = 0x5EED_7BAC_4E50_0002;

/// Agent and arena options for a simulator run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Agent options; the seed is overridden per run
    pub agent: AgentConfig,
    /// Arena options
    pub scene: SceneConfig,
}

impl SimConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Parse errors, or the first out-of-range option.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// I/O errors, otherwise as [`from_json_str`](Self::from_json_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate both halves.
    ///
    /// # Errors
    ///
    /// The first out-of-range option.
    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        self.scene.validate()
    }
}

/// Outcome of one headless episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Seed used for the scene, the agent and the simulated capabilities
    pub seed: u64,
    /// Agent loop totals
    pub stats: LoopStats,
    /// Shots fired
    pub shots: u64,
    /// Shots that hit a shape
    pub hits: u64,
    /// Sum of base scores of the shapes hit
    pub score: f64,
    /// Behavior state changes
    pub transitions: u64,
    /// Behavior state at the end
    pub final_state: String,
}

impl RunSummary {
    /// Hits per shot, or zero without shots.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.hits as f64 / self.shots as f64
    }
}

/// Run one seeded episode of `frames` iterations.
///
/// The player is selected at its true position in the first rendered frame.
///
/// # Errors
///
/// Invalid configuration, or any error from the agent loop.
pub fn run_headless(config: &SimConfig, seed: u64, frames: u64) -> Result<RunSummary> {
    config.scene.validate()?;
    let mut agent_config = config.agent.clone();
    agent_config.seed = Some(seed);

    let scene = Rc::new(RefCell::new(Scene::new(config.scene.clone(), seed)));
    let detector = SceneDetector::new(
        agent_config.perception.min_object_area,
        config.scene.detector_miss_rate,
        seed ^ DETECTOR_STREAM,
    );
    let trackers = SceneTrackerFactory::new(
        config.scene.tracker_failure_rate,
        config.scene.player_tracker_failure_rate,
        seed ^ TRACKER_STREAM,
    );
    let mut agent = Agent::new(agent_config, Box::new(detector), Box::new(trackers))?;

    let (first, view_center) = {
        let scene = scene.borrow();
        (scene.snapshot(), scene.player().center())
    };
    agent.initialize(&first, view_center);

    let mut source = SceneSource::new(Rc::clone(&scene), config.scene.drop_every);
    let mut actuator = scene_actuator(Rc::clone(&scene));
    let stats = agent.run(&mut source, &mut actuator, Some(frames), |_| false)?;

    let scene = scene.borrow();
    let summary = RunSummary {
        seed,
        stats,
        shots: scene.shots(),
        hits: scene.hits(),
        score: scene.score(),
        transitions: agent.behavior().transitions(),
        final_state: agent.behavior().state().to_string(),
    };
    info!(seed, hits = summary.hits, shots = summary.shots, "episode finished");
    Ok(summary)
}

/// Run one episode per seed in parallel. Results keep the order of `seeds`.
#[must_use]
pub fn run_batch(config: &SimConfig, seeds: &[u64], frames: u64) -> Vec<Result<RunSummary>> {
    seeds
        .par_iter()
        .map(|&seed| run_headless(config, seed, frames))
        .collect()
}
