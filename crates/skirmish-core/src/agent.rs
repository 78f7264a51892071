//! The agent: one value owning everything the frame loop touches.
//!
//! Each frame goes acquire, perceive, decide, actuate:
//!
//! 1. a [`FrameSource`] yields a frame, or nothing (the iteration is skipped);
//! 2. [`Perception`] brings the [`World`] up to date;
//! 3. [`Behavior`] turns the world into [`Command`]s;
//! 4. the commands go to an [`Actuator`].
//!
//! Any capability error aborts the frame and is returned to the caller; the
//! agent itself stays usable.

use std::fmt;
use std::time::{Duration, Instant};

use planar::{BBox, Vector2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::actuator::Actuator;
use crate::behavior::{Behavior, BehaviorState, Command};
use crate::config::AgentConfig;
use crate::error::Result;
use crate::perception::{Detector, Frame, FrameSource, Perception, PerceptionReport, TrackerFactory};
use crate::world::World;

// =============================================================================
// Outcomes and Statistics
// =============================================================================

/// What happened while processing one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameOutcome {
    /// Perception summary
    pub report: PerceptionReport,
    /// Behavior state after the decision
    pub state: BehaviorState,
    /// Commands sent to the actuator, in order
    pub commands: Vec<Command>,
}

/// Result of one [`Agent::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A frame was processed
    Processed(FrameOutcome),
    /// The source had no frame
    Skipped,
}

impl TickOutcome {
    /// The frame outcome, if a frame was processed.
    #[must_use]
    pub fn processed(&self) -> Option<&FrameOutcome> {
        match self {
            TickOutcome::Processed(outcome) => Some(outcome),
            TickOutcome::Skipped => None,
        }
    }
}

/// Running totals over the agent's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoopStats {
    /// Frames run through the pipeline
    pub frames_processed: u64,
    /// Iterations where the source had no frame
    pub frames_skipped: u64,
    /// Frames that ran a full detection
    pub full_detections: u64,
    /// Frames that ended with the player lost
    pub player_losses: u64,
    /// Commands sent to the actuator
    pub commands_issued: u64,
    /// Time spent in processed frames
    pub busy_time: Duration,
}

impl LoopStats {
    /// Mean time per processed frame.
    #[must_use]
    pub fn average_frame_time(&self) -> Option<Duration> {
        let frames = u32::try_from(self.frames_processed).ok().filter(|&n| n > 0)?;
        Some(self.busy_time / frames)
    }

    fn record(&mut self, outcome: &FrameOutcome, elapsed: Duration) {
        self.frames_processed += 1;
        if outcome.report.ran_full_detection() {
            self.full_detections += 1;
        }
        if outcome.report.player_lost() {
            self.player_losses += 1;
        }
        self.commands_issued += outcome.commands.len() as u64;
        self.busy_time += elapsed;
    }
}

impl fmt::Display for LoopStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames ({} skipped), {} full detections, {} commands",
            self.frames_processed, self.frames_skipped, self.full_detections, self.commands_issued
        )?;
        if let Some(avg) = self.average_frame_time() {
            write!(f, ", {avg:?}/frame")?;
        }
        Ok(())
    }
}

// =============================================================================
// Agent
// =============================================================================

/// The arena agent.
pub struct Agent<F: Frame> {
    config: AgentConfig,
    world: World,
    perception: Perception<F>,
    behavior: Behavior,
    stats: LoopStats,
    initialized: bool,
}

impl<F: Frame> fmt::Debug for Agent<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("world", &self.world)
            .field("perception", &self.perception)
            .field("behavior", &self.behavior)
            .field("stats", &self.stats)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl<F: Frame> Agent<F> {
    /// Build an agent from a validated config and the host's capabilities.
    ///
    /// # Arguments
    ///
    /// * `config` - Agent options; validated here
    /// * `detector` - Entity detector
    /// * `trackers` - Factory for player and entity trackers
    ///
    /// # Errors
    ///
    /// [`SkirmishError::InvalidConfig`](crate::error::SkirmishError::InvalidConfig)
    /// if the config fails validation.
    pub fn new(
        config: AgentConfig,
        detector: Box<dyn Detector<F>>,
        trackers: Box<dyn TrackerFactory<F>>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            world: World::new(config.capture_size),
            perception: Perception::new(config.perception.clone(), detector, trackers),
            behavior: Behavior::from_config(&config),
            stats: LoopStats::default(),
            initialized: false,
            config,
        })
    }

    /// Agent options.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Current world model.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Perception pipeline.
    #[must_use]
    pub const fn perception(&self) -> &Perception<F> {
        &self.perception
    }

    /// Behavior state machine.
    #[must_use]
    pub const fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// Totals so far.
    #[must_use]
    pub const fn stats(&self) -> &LoopStats {
        &self.stats
    }

    /// Whether the player has been selected.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Select the player: seed its tracker on a `player_search_size` box
    /// centred on `view_center`.
    ///
    /// Any previous tracked set is dropped, so the next frame runs a full
    /// detection.
    pub fn initialize(&mut self, frame: &F, view_center: Vector2) {
        let bbox = BBox::from_center(view_center, self.config.perception.player_search_size);
        self.perception.reset();
        self.perception.init_player(frame, bbox, &mut self.world);
        self.initialized = true;
        info!(player = %self.world.player(), "agent initialized");
    }

    /// Run one frame through perception, behavior and the actuator.
    ///
    /// If [`initialize`](Self::initialize) was never called, the player is
    /// selected at the center of this frame first.
    ///
    /// # Errors
    ///
    /// Propagates detector and actuator failures. Commands issued before an
    /// actuator failure are not rolled back.
    pub fn process_frame(&mut self, frame: &F, actuator: &mut dyn Actuator) -> Result<FrameOutcome> {
        let started = Instant::now();
        if !self.initialized {
            self.initialize(frame, frame.size().center());
        }

        let report = self.perception.update(frame, &mut self.world)?;
        let commands = self.behavior.decide(&self.world);
        for command in &commands {
            command.apply(actuator)?;
        }

        let outcome = FrameOutcome {
            report,
            state: *self.behavior.state(),
            commands,
        };
        self.stats.record(&outcome, started.elapsed());
        Ok(outcome)
    }

    /// Acquire a frame and process it.
    ///
    /// # Errors
    ///
    /// Propagates frame source failures, then as
    /// [`process_frame`](Self::process_frame).
    pub fn tick(
        &mut self,
        source: &mut dyn FrameSource<F>,
        actuator: &mut dyn Actuator,
    ) -> Result<TickOutcome> {
        let Some(frame) = source.acquire()? else {
            self.stats.frames_skipped += 1;
            return Ok(TickOutcome::Skipped);
        };
        self.process_frame(&frame, actuator).map(TickOutcome::Processed)
    }

    /// Tick until `limit` iterations have run or `should_stop` returns true.
    ///
    /// `should_stop` is checked before every iteration. Skipped frames count
    /// towards `limit`.
    ///
    /// # Arguments
    ///
    /// * `source` - Frame source
    /// * `actuator` - Output
    /// * `limit` - Maximum iterations; `None` to rely on `should_stop` alone
    /// * `should_stop` - Stop predicate over the running totals
    ///
    /// # Errors
    ///
    /// The first error from [`tick`](Self::tick) ends the loop.
    pub fn run<P>(
        &mut self,
        source: &mut dyn FrameSource<F>,
        actuator: &mut dyn Actuator,
        limit: Option<u64>,
        mut should_stop: P,
    ) -> Result<LoopStats>
    where
        P: FnMut(&LoopStats) -> bool,
    {
        info!(?limit, "agent loop started");
        let mut iterations = 0u64;
        while limit.map_or(true, |limit| iterations < limit) && !should_stop(&self.stats) {
            let outcome = self.tick(source, actuator)?;
            if let TickOutcome::Processed(frame) = &outcome {
                debug!(state = %frame.state, commands = frame.commands.len(), "frame done");
            }
            iterations += 1;
        }
        info!(stats = %self.stats, "agent loop stopped");
        Ok(self.stats)
    }
}
