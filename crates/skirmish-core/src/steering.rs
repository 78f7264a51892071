//! Local obstacle avoidance.
//!
//! The agent looks around itself with two sensing circles of the same radius:
//! one centred on the player and one pushed forward along the desired
//! direction. Every perceived entity touching a circle pushes the direction
//! away from itself with a force that decays exponentially with distance.
//! An entity touching both circles pushes twice.
//!
//! The result is not renormalized. Callers that only care about the heading
//! (the keyboard actuator, for instance) normalize it themselves.
//!
//! # Example
//!
//! ```
//! use planar::{BBox, Extent, Vector2};
//! use skirmish_core::config::SteeringConfig;
//! use skirmish_core::entity::{Entity, EntityTag};
//! use skirmish_core::steering::ObstacleAvoidance;
//! use skirmish_core::world::World;
//!
//! let mut world = World::new(Extent::new(800.0, 400.0));
//! world.set_player(Entity::player(BBox::new(-1.0, -1.0, 2.0, 2.0)));
//!
//! let avoidance = ObstacleAvoidance::new(SteeringConfig::default());
//! assert_eq!(avoidance.steer(Vector2::new(1.0, 0.0), &world), Vector2::new(200.0, 0.0));
//!
//! world.set_entities(vec![Entity::new(EntityTag::Square, BBox::new(20.0, 0.0, 10.0, 10.0))]);
//! assert!(avoidance.steer(Vector2::new(1.0, 0.0), &world).x() < 200.0);
//! ```

use planar::{BBox, Circle, Vector2};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::SteeringConfig;
use crate::world::World;

/// The two circles used to sense obstacles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensingCircles {
    /// Circle ahead of the player along the desired direction
    pub forward: Circle,
    /// Circle around the player
    pub surround: Circle,
}

impl SensingCircles {
    /// How many of the two circles touch `rect`.
    #[must_use]
    pub fn hits(&self, rect: &BBox) -> usize {
        usize::from(self.forward.intersects_rect(rect)) + usize::from(self.surround.intersects_rect(rect))
    }
}

/// Obstacle avoidance steering.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObstacleAvoidance {
    config: SteeringConfig,
}

impl ObstacleAvoidance {
    /// Create a steering helper with the given constants.
    #[must_use]
    pub const fn new(config: SteeringConfig) -> Self {
        Self { config }
    }

    /// The steering constants.
    #[must_use]
    pub const fn config(&self) -> &SteeringConfig {
        &self.config
    }

    /// Sensing circles for a player at `player_center` heading along `direction`.
    #[must_use]
    pub fn sensing_circles(&self, direction: Vector2, player_center: Vector2) -> SensingCircles {
        let offset = direction.normalize().with_length(self.config.sight_offset);
        SensingCircles {
            forward: Circle::new(player_center + offset, self.config.max_see_ahead),
            surround: Circle::new(player_center, self.config.max_see_ahead),
        }
    }

    /// Magnitude of the repulsion from an obstacle `distance` away.
    ///
    /// `exp(-k * distance + ln(max * min)) + min`
    #[must_use]
    pub fn repulsion_magnitude(&self, distance: f64) -> f64 {
        let c = &self.config;
        (-c.avoidance_factor * distance + (c.max_avoidance_force * c.min_avoidance_force).ln()).exp()
            + c.min_avoidance_force
    }

    /// Force pushing the player away from `obstacle`.
    ///
    /// An obstacle centred exactly on the player has no direction and exerts
    /// no force.
    #[must_use]
    pub fn repulsion(&self, obstacle: &BBox, player_center: Vector2) -> Vector2 {
        let obstacle_center = obstacle.center();
        let distance = player_center.distance_to(obstacle_center);
        let towards = obstacle_center - player_center;
        towards.normalize().with_length(-self.repulsion_magnitude(distance))
    }

    /// Steer `direction` around the obstacles in `world`.
    ///
    /// # Arguments
    ///
    /// * `direction` - Desired direction; only its heading matters
    /// * `world` - Current world; the player center is the sensing origin
    ///
    /// # Returns
    ///
    /// The desired direction scaled to the base force plus every repulsion.
    #[must_use]
    pub fn steer(&self, direction: Vector2, world: &World) -> Vector2 {
        let player_center = world.player_center();
        let circles = self.sensing_circles(direction, player_center);
        let mut steered = direction.normalize().with_length(self.config.direction_force);

        for entity in world.entities() {
            let hits = circles.hits(&entity.bbox);
            if hits == 0 {
                continue;
            }
            let force = self.repulsion(&entity.bbox, player_center);
            trace!(tag = %entity.tag, %force, hits, "avoidance force");
            for _ in 0..hits {
                steered += force;
            }
        }
        steered
    }
}
