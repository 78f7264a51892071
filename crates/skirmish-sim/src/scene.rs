//! The synthetic arena.
//!
//! A [`Scene`] holds the player and a handful of drifting shapes. Shapes bounce
//! off the arena walls and respawn somewhere else when shot. The player moves
//! by whatever direction keys are held, using the same eight-way mapping the
//! keyboard actuator produces.

use std::f64::consts::TAU;

use planar::{BBox, Extent, Vector2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use skirmish_core::actuator::DirectionKeys;
use skirmish_core::classify::{reference_colour, Bgr};
use skirmish_core::entity::EntityTag;
use skirmish_core::error::{Result, SkirmishError};
use tracing::debug;

use crate::frame::{SceneFrame, Sprite};

/// Attempts at finding a spawn position clear of the player.
const SPAWN_ATTEMPTS: usize = 32;

/// Vertex count drawn for round objects.
const ROUND_VERTICES: usize = 8;

// =============================================================================
// Configuration
// =============================================================================

/// Arena and simulated-capability options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Arena size in pixels
    pub size: Extent,
    /// Number of shapes kept alive
    pub shapes: usize,
    /// Smallest and largest shape side
    pub shape_size: (f64, f64),
    /// Player side length
    pub player_size: f64,
    /// Player speed in pixels per frame
    pub player_speed: f64,
    /// Shape drift speed in pixels per frame
    pub drift_speed: f64,
    /// Chance a spawned object is an enemy rather than a shape
    pub enemy_chance: f64,
    /// Chance the detector misses a visible sprite
    pub detector_miss_rate: f64,
    /// Chance per frame an entity tracker loses its target
    pub tracker_failure_rate: f64,
    /// Chance per frame the player tracker loses the player
    pub player_tracker_failure_rate: f64,
    /// Drop every n-th frame (0 never drops)
    pub drop_every: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            size: Extent::new(800.0, 400.0),
            shapes: 10,
            shape_size: (24.0, 40.0),
            player_size: 40.0,
            player_speed: 4.0,
            drift_speed: 0.5,
            enemy_chance: 0.1,
            detector_miss_rate: 0.0,
            tracker_failure_rate: 0.02,
            player_tracker_failure_rate: 0.005,
            drop_every: 0,
        }
    }
}

impl SceneConfig {
    /// Check every option is in range.
    ///
    /// # Errors
    ///
    /// [`SkirmishError::InvalidConfig`] naming the first offending option.
    pub fn validate(&self) -> Result<()> {
        if !self.size.is_positive() {
            return Err(SkirmishError::invalid_config("scene.size must be positive"));
        }
        let (min, max) = self.shape_size;
        if !(min > 0.0 && min <= max) {
            return Err(SkirmishError::invalid_config(
                "scene.shape_size must satisfy 0 < min <= max",
            ));
        }
        let smallest_side = self.size.width.min(self.size.height);
        if max >= smallest_side || self.player_size <= 0.0 || self.player_size >= smallest_side {
            return Err(SkirmishError::invalid_config(
                "scene shapes and player must fit inside the arena",
            ));
        }
        for (name, p) in [
            ("scene.enemy_chance", self.enemy_chance),
            ("scene.detector_miss_rate", self.detector_miss_rate),
            ("scene.tracker_failure_rate", self.tracker_failure_rate),
            ("scene.player_tracker_failure_rate", self.player_tracker_failure_rate),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SkirmishError::invalid_config(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        if self.player_speed < 0.0 || self.drift_speed < 0.0 {
            return Err(SkirmishError::invalid_config("scene speeds must not be negative"));
        }
        Ok(())
    }
}

// =============================================================================
// Shapes
// =============================================================================

/// A live object in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// What the object is
    pub tag: EntityTag,
    /// Screen box
    pub bbox: BBox,
    /// Drift per frame
    pub velocity: Vector2,
}

impl Shape {
    /// How the shape is drawn.
    #[must_use]
    pub fn sprite(&self) -> Sprite {
        let vertices = match self.tag {
            EntityTag::Triangle => 3,
            EntityTag::Square => 4,
            EntityTag::Pentagon => 5,
            _ => ROUND_VERTICES,
        };
        Sprite {
            bbox: self.bbox,
            colour: reference_colour(self.tag).unwrap_or_default(),
            vertices,
        }
    }
}

// =============================================================================
// Scene
// =============================================================================

/// Arena state.
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    rng: ChaCha8Rng,
    player: BBox,
    shapes: Vec<Shape>,
    held: DirectionKeys,
    frame: u64,
    shots: u64,
    hits: u64,
    score: f64,
}

impl Scene {
    /// Populate an arena. The player starts at the center.
    #[must_use]
    pub fn new(config: SceneConfig, seed: u64) -> Self {
        let player = BBox::from_center(config.size.center(), Extent::square(config.player_size));
        let mut scene = Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            player,
            shapes: Vec::with_capacity(config.shapes),
            held: DirectionKeys::empty(),
            frame: 0,
            shots: 0,
            hits: 0,
            score: 0.0,
            config,
        };
        for _ in 0..scene.config.shapes {
            let shape = scene.spawn();
            scene.shapes.push(shape);
        }
        scene
    }

    /// Arena options.
    #[must_use]
    pub const fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Player box.
    #[must_use]
    pub const fn player(&self) -> BBox {
        self.player
    }

    /// Live shapes.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Currently held movement keys.
    #[must_use]
    pub const fn held(&self) -> DirectionKeys {
        self.held
    }

    /// Frames advanced so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Shots fired.
    #[must_use]
    pub const fn shots(&self) -> u64 {
        self.shots
    }

    /// Shots that landed on a shape.
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Sum of the base scores of every shape hit.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Hold a movement key.
    pub fn press(&mut self, key: DirectionKeys) {
        self.held |= key;
    }

    /// Release a movement key.
    pub fn release(&mut self, key: DirectionKeys) {
        self.held.remove(key);
    }

    /// Move the player and every shape by one frame.
    pub fn advance(&mut self) {
        self.frame += 1;

        let step = self.held.to_direction() * self.config.player_speed;
        self.player = clamp_into(self.player.translated(step), self.config.size);

        let arena = self.config.size;
        for shape in &mut self.shapes {
            let moved = shape.bbox.translated(shape.velocity);
            let c = moved.corners();
            let mut vx = shape.velocity.x();
            let mut vy = shape.velocity.y();
            if c.x1 < 0.0 || c.x2 > arena.width {
                vx = -vx;
            }
            if c.y1 < 0.0 || c.y2 > arena.height {
                vy = -vy;
            }
            shape.velocity = Vector2::new(vx, vy);
            shape.bbox = clamp_into(moved, arena);
        }
    }

    /// Fire at `point`. A hit shape respawns elsewhere.
    ///
    /// Returns the tag of the shape hit, if any.
    pub fn fire(&mut self, point: Vector2) -> Option<EntityTag> {
        self.shots += 1;
        let index = self
            .shapes
            .iter()
            .position(|s| point.inside_rect(&s.bbox.corners()))?;

        let tag = self.shapes[index].tag;
        self.hits += 1;
        self.score += tag.base_score();
        let replacement = self.spawn();
        self.shapes[index] = replacement;
        debug!(%tag, %point, frame = self.frame, "shape hit");
        Some(tag)
    }

    /// Render the current state.
    #[must_use]
    pub fn snapshot(&self) -> SceneFrame {
        let player = Sprite {
            bbox: self.player,
            colour: reference_colour(EntityTag::Ally).unwrap_or(Bgr::new(225, 178, 43)),
            vertices: ROUND_VERTICES,
        };
        let sprites = std::iter::once(player)
            .chain(self.shapes.iter().map(Shape::sprite))
            .collect();
        SceneFrame::new(self.frame, self.config.size, sprites)
    }

    fn spawn(&mut self) -> Shape {
        let (min, max) = self.config.shape_size;
        let keep_out = self.player.expanded(Extent::square(self.config.player_size));

        let mut bbox = BBox::default();
        for _ in 0..SPAWN_ATTEMPTS {
            let side = self.rng.gen_range(min..=max);
            let x = self.rng.gen_range(0.0..=(self.config.size.width - side).max(0.0));
            let y = self.rng.gen_range(0.0..=(self.config.size.height - side).max(0.0));
            bbox = BBox::new(x, y, side, side);
            if !bbox.overlaps(&keep_out) {
                break;
            }
        }

        let tag = if self.rng.gen::<f64>() < self.config.enemy_chance {
            EntityTag::Enemy
        } else {
            match self.rng.gen_range(0..10) {
                0 => EntityTag::Pentagon,
                1..=3 => EntityTag::Triangle,
                _ => EntityTag::Square,
            }
        };
        let heading = Vector2::new(1.0, 0.0).with_angle(self.rng.gen_range(0.0..TAU));
        Shape {
            tag,
            bbox,
            velocity: heading * self.config.drift_speed,
        }
    }
}

/// Moves `bbox` back inside an arena of `size` without resizing it.
fn clamp_into(bbox: BBox, size: Extent) -> BBox {
    let x = bbox.x().clamp(0.0, (size.width - bbox.width()).max(0.0));
    let y = bbox.y().clamp(0.0, (size.height - bbox.height()).max(0.0));
    BBox::new(x, y, bbox.width(), bbox.height())
}
