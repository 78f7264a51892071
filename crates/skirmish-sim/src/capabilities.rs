//! Core capability implementations backed by a [`Scene`].
//!
//! Source and actuator share the scene through `Rc<RefCell<..>>`: the source
//! advances and renders it, the actuator's key driver holds keys and fires
//! into it. The agent loop calls them one after the other, never nested.

use std::cell::RefCell;
use std::rc::Rc;

use planar::{BBox, Vector2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skirmish_core::actuator::{DirectionKeys, KeyDriver, KeyboardActuator};
use skirmish_core::classify::classify;
use skirmish_core::entity::Entity;
use skirmish_core::error::Result;
use skirmish_core::perception::{DetectRequest, Detector, FrameSource, Tracker, TrackerFactory, TrackerRole};
use tracing::trace;

use crate::frame::{SceneFrame, Sprite};
use crate::scene::Scene;

/// Scene shared between the source and the actuator.
pub type SharedScene = Rc<RefCell<Scene>>;

// =============================================================================
// Detector
// =============================================================================

/// Contour detector over rendered sprites.
///
/// Sprites below the minimum area are ignored, and each visible sprite is
/// missed with a configurable probability.
#[derive(Debug, Clone)]
pub struct SceneDetector {
    min_area: f64,
    miss_rate: f64,
    rng: ChaCha8Rng,
}

impl SceneDetector {
    /// Create a detector.
    ///
    /// # Arguments
    ///
    /// * `min_area` - Smallest sprite area reported
    /// * `miss_rate` - Probability of skipping a visible sprite
    /// * `seed` - Seed for the miss draws
    #[must_use]
    pub fn new(min_area: f64, miss_rate: f64, seed: u64) -> Self {
        Self {
            min_area,
            miss_rate,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Detector<SceneFrame> for SceneDetector {
    fn detect(&mut self, frame: &SceneFrame, request: &DetectRequest) -> Result<Vec<Entity>> {
        let mut found = Vec::new();
        for sprite in frame.sprites() {
            if sprite.bbox.area() < self.min_area {
                continue;
            }
            if self.miss_rate > 0.0 && self.rng.gen::<f64>() < self.miss_rate {
                continue;
            }
            let bbox = sprite.bbox.translated(request.origin);
            if request.excludes(&bbox) {
                continue;
            }
            found.push(Entity::new(classify(&sprite.features()), bbox));
            if request.is_satisfied(found.len()) {
                break;
            }
        }
        trace!(found = found.len(), frame = frame.index(), "scene detection");
        Ok(found)
    }
}

// =============================================================================
// Trackers
// =============================================================================

/// Sprite with the largest overlap with `bbox`, if any overlaps at all.
fn best_overlap<'a>(frame: &'a SceneFrame, bbox: &BBox) -> Option<&'a Sprite> {
    frame
        .sprites()
        .iter()
        .filter_map(|s| s.bbox.intersection(bbox).map(|i| (s, i.area())))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(s, _)| s)
}

/// Follows the sprite under its box, keeping the box size it was given.
///
/// Once it fails it stays failed, like a real tracker that lost its template.
#[derive(Debug, Clone)]
pub struct SceneTracker {
    failure_rate: f64,
    rng: ChaCha8Rng,
    bbox: Option<BBox>,
    anchor: Option<Vector2>,
}

impl SceneTracker {
    /// Create an uninitialized tracker.
    #[must_use]
    pub fn new(failure_rate: f64, seed: u64) -> Self {
        Self {
            failure_rate,
            rng: ChaCha8Rng::seed_from_u64(seed),
            bbox: None,
            anchor: None,
        }
    }

    fn lose(&mut self) -> Option<BBox> {
        self.bbox = None;
        self.anchor = None;
        None
    }
}

impl Tracker<SceneFrame> for SceneTracker {
    fn init(&mut self, frame: &SceneFrame, bbox: BBox) {
        self.bbox = Some(bbox);
        self.anchor = best_overlap(frame, &bbox).map(|s| s.bbox.center());
    }

    fn update(&mut self, frame: &SceneFrame) -> Option<BBox> {
        let bbox = self.bbox?;
        if self.rng.gen::<f64>() < self.failure_rate {
            return self.lose();
        }
        let Some(sprite) = best_overlap(frame, &bbox) else {
            return self.lose();
        };

        let center = sprite.bbox.center();
        let previous = self.anchor.unwrap_or_else(|| bbox.center());
        let moved = bbox.translated(center - previous);
        self.bbox = Some(moved);
        self.anchor = Some(center);
        Some(moved)
    }
}

/// Hands out [`SceneTracker`]s, each with its own RNG stream.
#[derive(Debug, Clone)]
pub struct SceneTrackerFactory {
    entity_failure_rate: f64,
    player_failure_rate: f64,
    rng: ChaCha8Rng,
}

impl SceneTrackerFactory {
    /// Create a factory.
    #[must_use]
    pub fn new(entity_failure_rate: f64, player_failure_rate: f64, seed: u64) -> Self {
        Self {
            entity_failure_rate,
            player_failure_rate,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl TrackerFactory<SceneFrame> for SceneTrackerFactory {
    fn create(&mut self, role: TrackerRole) -> Box<dyn Tracker<SceneFrame>> {
        let failure_rate = match role {
            TrackerRole::Player => self.player_failure_rate,
            TrackerRole::Entity => self.entity_failure_rate,
        };
        Box::new(SceneTracker::new(failure_rate, self.rng.gen()))
    }
}

// =============================================================================
// Source and Actuator
// =============================================================================

/// Advances the scene and renders one frame per acquire.
#[derive(Debug)]
pub struct SceneSource {
    scene: SharedScene,
    drop_every: u64,
    acquired: u64,
}

impl SceneSource {
    /// Create a source. Every `drop_every`-th acquire yields no frame
    /// (0 never drops); the scene still advances.
    #[must_use]
    pub fn new(scene: SharedScene, drop_every: u64) -> Self {
        Self {
            scene,
            drop_every,
            acquired: 0,
        }
    }
}

impl FrameSource<SceneFrame> for SceneSource {
    fn acquire(&mut self) -> Result<Option<SceneFrame>> {
        self.acquired += 1;
        let mut scene = self.scene.borrow_mut();
        scene.advance();
        if self.drop_every > 0 && self.acquired % self.drop_every == 0 {
            return Ok(None);
        }
        Ok(Some(scene.snapshot()))
    }
}

/// Key driver that holds keys and fires directly in the scene.
#[derive(Debug, Clone)]
pub struct SceneKeys {
    scene: SharedScene,
}

impl SceneKeys {
    /// Create a driver for `scene`.
    #[must_use]
    pub fn new(scene: SharedScene) -> Self {
        Self { scene }
    }
}

impl KeyDriver for SceneKeys {
    fn press(&mut self, key: DirectionKeys) -> Result<()> {
        self.scene.borrow_mut().press(key);
        Ok(())
    }

    fn release(&mut self, key: DirectionKeys) -> Result<()> {
        self.scene.borrow_mut().release(key);
        Ok(())
    }

    fn press_pointer(&mut self, point: Vector2) -> Result<()> {
        self.scene.borrow_mut().fire(point);
        Ok(())
    }

    fn release_pointer(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Keyboard actuator driving a scene.
pub type SceneActuator = KeyboardActuator<SceneKeys>;

/// Actuator for `scene`. The capture covers the whole arena, so the screen
/// origin is zero.
#[must_use]
pub fn scene_actuator(scene: SharedScene) -> SceneActuator {
    KeyboardActuator::new(SceneKeys::new(scene), Vector2::ZERO)
}
