//! World model: the agent's current picture of the arena.
//!
//! The World owns exactly one Player entity and an ordered list of perceived
//! entities. It is rebuilt incrementally by the perception pipeline every frame
//! and read by the behavior state machine.
//!
//! # Collision Cache
//!
//! Player/entity overlaps are cached on demand. Replacing the player or the
//! entity list invalidates the cache:
//!
//! ```
//! use planar::{BBox, Extent};
//! use skirmish_core::entity::{Entity, EntityTag};
//! use skirmish_core::world::World;
//!
//! let mut world = World::new(Extent::new(800.0, 400.0));
//! world.set_player(Entity::player(BBox::new(0.0, 0.0, 20.0, 20.0)));
//! world.set_entities(vec![
//!     Entity::new(EntityTag::Square, BBox::new(10.0, 10.0, 10.0, 10.0)),
//!     Entity::new(EntityTag::Square, BBox::new(100.0, 10.0, 10.0, 10.0)),
//! ]);
//! assert!(!world.has_computed_collisions());
//!
//! world.recompute_collisions();
//! assert_eq!(world.collisions(), &[0]);
//!
//! world.set_entities(Vec::new());
//! assert!(world.collisions().is_empty());
//! assert!(!world.has_computed_collisions());
//! ```

use planar::{BBox, Extent, Vector2};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Snapshot of the arena as perceived by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// Capture size the world was created for.
    size: Extent,
    /// The controlled entity.
    player: Entity,
    /// Perceived entities in detection order.
    entities: Vec<Entity>,
    /// Indices into `entities` overlapping the player box.
    collisions: Vec<usize>,
    /// Whether `collisions` reflects the current player and entities.
    collisions_computed: bool,
}

impl World {
    /// Creates a world for a capture of the given size.
    ///
    /// The player starts as a 1x1 box at the capture center and the entity
    /// list is empty.
    #[must_use]
    pub fn new(size: Extent) -> Self {
        let center = size.center();
        Self {
            size,
            player: Entity::player(BBox::new(center.x(), center.y(), 1.0, 1.0)),
            entities: Vec::new(),
            collisions: Vec::new(),
            collisions_computed: false,
        }
    }

    /// Capture size.
    #[must_use]
    pub const fn size(&self) -> Extent {
        self.size
    }

    /// The controlled entity.
    #[must_use]
    pub const fn player(&self) -> &Entity {
        &self.player
    }

    /// Center of the controlled entity.
    #[must_use]
    pub fn player_center(&self) -> Vector2 {
        self.player.center()
    }

    /// Replaces the controlled entity and invalidates cached collisions.
    pub fn set_player(&mut self, player: Entity) {
        self.player = player;
        self.invalidate_collisions();
    }

    /// Perceived entities.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of perceived entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Whether nothing besides the player is perceived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Replaces the entity list and invalidates cached collisions.
    pub fn set_entities(&mut self, entities: Vec<Entity>) {
        self.entities = entities;
        self.invalidate_collisions();
    }

    /// Indices of entities overlapping the player, as of the last
    /// [`recompute_collisions`](Self::recompute_collisions).
    #[must_use]
    pub fn collisions(&self) -> &[usize] {
        &self.collisions
    }

    /// Whether the collision list is current.
    #[must_use]
    pub const fn has_computed_collisions(&self) -> bool {
        self.collisions_computed
    }

    /// Records the indices of entities whose box overlaps the player box.
    pub fn recompute_collisions(&mut self) {
        let player_box = self.player.bbox;
        self.collisions = self
            .entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.bbox.overlaps(&player_box))
            .map(|(i, _)| i)
            .collect();
        self.collisions_computed = true;
    }

    fn invalidate_collisions(&mut self) {
        self.collisions.clear();
        self.collisions_computed = false;
    }
}
