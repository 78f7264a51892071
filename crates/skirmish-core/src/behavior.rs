//! Explore/Target behavior state machine.
//!
//! [`BehaviorState`] is a plain value; [`BehaviorState::step`] reads the
//! world, draws from an injected RNG and returns the next state plus the
//! commands to issue this frame. [`Behavior`] wraps the current state with a
//! seeded RNG and the steering helper for use by the agent loop.
//!
//! ```text
//!            entities seen
//!   Explore ---------------> Target
//!      ^                        |
//!      +------------------------+
//!            nothing to rank
//! ```
//!
//! A transition frame issues no commands. The agent acts on the next frame
//! from the new state.
//!
//! # Example
//!
//! ```
//! use planar::{BBox, Extent};
//! use skirmish_core::behavior::{Behavior, Command};
//! use skirmish_core::config::AgentConfig;
//! use skirmish_core::entity::{Entity, EntityTag};
//! use skirmish_core::world::World;
//!
//! let config = AgentConfig::with_seed(7);
//! let mut behavior = Behavior::from_config(&config);
//! let mut world = World::new(Extent::new(800.0, 400.0));
//!
//! // Nothing around: wander.
//! assert!(matches!(behavior.decide(&world).as_slice(), [Command::Move { .. }]));
//!
//! // A shape appears: switch state, then move and shoot.
//! world.set_entities(vec![Entity::new(EntityTag::Square, BBox::new(450.0, 200.0, 10.0, 10.0))]);
//! assert!(behavior.decide(&world).is_empty());
//! assert!(behavior.state().is_target());
//! assert_eq!(behavior.decide(&world).len(), 2);
//! ```

use std::f64::consts::TAU;
use std::fmt;

use planar::Vector2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actuator::Actuator;
use crate::config::{AgentConfig, BehaviorConfig, SteeringConfig};
use crate::error::Result;
use crate::ranking::rank_by_importance;
use crate::steering::ObstacleAvoidance;
use crate::world::World;

// =============================================================================
// Commands
// =============================================================================

/// Output of one decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Move along `direction` (steered, not normalized)
    Move {
        /// Direction to move in
        direction: Vector2,
    },
    /// Fire at `target` in capture coordinates
    Shoot {
        /// Aim point
        target: Vector2,
    },
}

impl Command {
    /// Forward the command to `actuator`.
    ///
    /// # Errors
    ///
    /// Propagates actuator failures.
    pub fn apply(&self, actuator: &mut dyn Actuator) -> Result<()> {
        match *self {
            Command::Move { direction } => actuator.move_towards(direction),
            Command::Shoot { target } => actuator.shoot(target),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move { direction } => write!(f, "Move {direction}"),
            Command::Shoot { target } => write!(f, "Shoot {target}"),
        }
    }
}

// =============================================================================
// States
// =============================================================================

/// Everything a state needs besides the world.
#[derive(Debug)]
pub struct BehaviorContext<'a, R: Rng> {
    /// Random source for wander headings
    pub rng: &'a mut R,
    /// Steering applied to every movement
    pub avoidance: &'a ObstacleAvoidance,
    /// Behavior options
    pub config: &'a BehaviorConfig,
}

/// Current behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Wander with a slowly changing heading until something shows up
    Explore {
        /// Unit wander heading
        heading: Vector2,
    },
    /// Chase and shoot the most important entity
    Target,
}

impl BehaviorState {
    /// Explore state with a uniformly random unit heading.
    pub fn explore<R: Rng>(rng: &mut R) -> Self {
        BehaviorState::Explore {
            heading: random_heading(rng),
        }
    }

    /// Whether this is the Explore state.
    #[must_use]
    pub const fn is_explore(&self) -> bool {
        matches!(self, BehaviorState::Explore { .. })
    }

    /// Whether this is the Target state.
    #[must_use]
    pub const fn is_target(&self) -> bool {
        matches!(self, BehaviorState::Target)
    }

    /// Advance one frame.
    ///
    /// # Returns
    ///
    /// The state for the next frame and the commands for this one.
    pub fn step<R: Rng>(self, world: &World, ctx: &mut BehaviorContext<'_, R>) -> (Self, Vec<Command>) {
        match self {
            BehaviorState::Explore { heading } => explore(heading, world, ctx),
            BehaviorState::Target => target(world, ctx),
        }
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorState::Explore { .. } => write!(f, "Explore"),
            BehaviorState::Target => write!(f, "Target"),
        }
    }
}

fn random_heading<R: Rng>(rng: &mut R) -> Vector2 {
    Vector2::new(1.0, 0.0).with_angle(rng.gen_range(0.0..TAU))
}

fn explore<R: Rng>(
    mut heading: Vector2,
    world: &World,
    ctx: &mut BehaviorContext<'_, R>,
) -> (BehaviorState, Vec<Command>) {
    if !world.is_empty() {
        return (BehaviorState::Target, Vec::new());
    }

    if ctx.rng.gen::<f64>() < ctx.config.direction_change_chance {
        heading.set_angle(ctx.rng.gen_range(0.0..TAU));
    }

    let direction = ctx.avoidance.steer(heading, world);
    (
        BehaviorState::Explore { heading },
        vec![Command::Move { direction }],
    )
}

fn target<R: Rng>(world: &World, ctx: &mut BehaviorContext<'_, R>) -> (BehaviorState, Vec<Command>) {
    let player_center = world.player_center();
    let ranked = rank_by_importance(world.entities(), player_center);
    let Some(best) = ranked.first() else {
        return (BehaviorState::explore(&mut *ctx.rng), Vec::new());
    };

    let aim = best.entity.center();
    let direction = ctx.avoidance.steer(aim - player_center, world);
    (
        BehaviorState::Target,
        vec![Command::Move { direction }, Command::Shoot { target: aim }],
    )
}

// =============================================================================
// Behavior
// =============================================================================

/// The state machine together with its RNG and steering.
#[derive(Debug, Clone)]
pub struct Behavior {
    state: BehaviorState,
    rng: ChaCha8Rng,
    avoidance: ObstacleAvoidance,
    config: BehaviorConfig,
    transitions: u64,
}

impl Behavior {
    /// Create a machine in the Explore state.
    ///
    /// # Arguments
    ///
    /// * `config` - Behavior options
    /// * `steering` - Obstacle avoidance constants
    /// * `seed` - RNG seed; drawn from entropy when `None`
    #[must_use]
    pub fn new(config: BehaviorConfig, steering: SteeringConfig, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let state = BehaviorState::explore(&mut rng);
        Self {
            state,
            rng,
            avoidance: ObstacleAvoidance::new(steering),
            config,
            transitions: 0,
        }
    }

    /// Create a machine from the agent config.
    #[must_use]
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.behavior, config.steering, config.seed)
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &BehaviorState {
        &self.state
    }

    /// Number of state changes so far.
    #[must_use]
    pub const fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Steering helper in use.
    #[must_use]
    pub const fn avoidance(&self) -> &ObstacleAvoidance {
        &self.avoidance
    }

    /// Run one step of the state machine against `world`.
    pub fn decide(&mut self, world: &World) -> Vec<Command> {
        let mut ctx = BehaviorContext {
            rng: &mut self.rng,
            avoidance: &self.avoidance,
            config: &self.config,
        };
        let previous = self.state;
        let (next, commands) = previous.step(world, &mut ctx);

        if previous.is_explore() != next.is_explore() {
            self.transitions += 1;
            debug!(from = %previous, to = %next, entities = world.entity_count(), "behavior transition");
        }
        self.state = next;
        commands
    }
}
