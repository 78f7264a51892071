//! Perception pipeline: keeps the [`World`] current from frame to frame.
//!
//! Detection is expensive and tracking is cheap but drifts and drops targets,
//! so the pipeline mixes the two:
//!
//! 1. **Player**: a dedicated tracker follows the player. If it fails, the
//!    player is redetected in a padded crop around its last box; on success a
//!    fresh player tracker is seeded, otherwise the player keeps its last box
//!    and is flagged untracked.
//! 2. **Full detection**: on the first frame and then every `detect_rate`
//!    frames, the tracked set is thrown away and rebuilt from a full-frame
//!    detection that ignores anything overlapping the player.
//! 3. **Tracking**: on all other frames each entity's tracker is advanced,
//!    with the same crop-and-redetect recovery as the player.
//!
//! The resulting entity list is installed into the world every frame.
//!
//! # Example
//!
//! ```ignore
//! let mut perception = Perception::new(config.perception.clone(), detector, trackers);
//! perception.init_player(&first_frame, player_box, &mut world);
//! loop {
//!     let report = perception.update(&frame, &mut world)?;
//!     tracing::debug!(%report);
//! }
//! ```

mod capability;
mod report;
mod tracked;

pub use capability::{DetectRequest, Detector, Frame, FrameSource, Tracker, TrackerFactory, TrackerRole};
pub use report::{PerceptionEvents, PerceptionReport};
pub use tracked::{TrackStatus, TrackedSet};

use std::fmt;

use planar::BBox;
use tracing::{debug, warn};

use crate::config::PerceptionConfig;
use crate::entity::{Entity, EntityTag};
use crate::error::Result;
use crate::world::World;

// =============================================================================
// Redetection
// =============================================================================

/// Looks for a single entity inside `search`.
///
/// The search box is clamped to the frame and snapped to whole pixels before
/// cropping. The detector sees only the crop and is told the crop's top-left
/// corner as origin, so the returned entity is in frame coordinates.
///
/// Returns `Ok(None)` without calling the detector if the search box lies
/// entirely outside the frame.
///
/// # Errors
///
/// Propagates detector failures.
pub fn redetect<F: Frame>(
    frame: &F,
    search: &BBox,
    detector: &mut dyn Detector<F>,
) -> Result<Option<Entity>> {
    let region = search.fit_within(frame.size()).snapped();
    if region.is_empty() {
        return Ok(None);
    }
    let crop = frame.crop(&region);
    let request = DetectRequest::single_at(region.origin());
    Ok(detector.detect(&crop, &request)?.into_iter().next())
}

// =============================================================================
// Perception
// =============================================================================

/// Detect/track/redetect state machine.
///
/// Owns the detector, the tracker factory, the player tracker and the tracked
/// set. The [`World`] it updates is owned by the caller.
pub struct Perception<F: Frame> {
    config: PerceptionConfig,
    detector: Box<dyn Detector<F>>,
    trackers: Box<dyn TrackerFactory<F>>,
    player_tracker: Box<dyn Tracker<F>>,
    tracked: Option<TrackedSet<F>>,
    frames_passed: u32,
}

impl<F: Frame> fmt::Debug for Perception<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Perception")
            .field("config", &self.config)
            .field("tracked", &self.tracked)
            .field("frames_passed", &self.frames_passed)
            .finish_non_exhaustive()
    }
}

impl<F: Frame> Perception<F> {
    /// Creates a pipeline. No frame has been seen yet, so the first
    /// [`update`](Self::update) runs a full detection.
    #[must_use]
    pub fn new(
        config: PerceptionConfig,
        detector: Box<dyn Detector<F>>,
        mut trackers: Box<dyn TrackerFactory<F>>,
    ) -> Self {
        let player_tracker = trackers.create(TrackerRole::Player);
        Self {
            config,
            detector,
            trackers,
            player_tracker,
            tracked: None,
            frames_passed: 0,
        }
    }

    /// Pipeline options.
    #[must_use]
    pub const fn config(&self) -> &PerceptionConfig {
        &self.config
    }

    /// Frames since the last full detection, modulo the detection rate.
    #[must_use]
    pub const fn frames_passed(&self) -> u32 {
        self.frames_passed
    }

    /// The current tracked set, if a detection has run.
    #[must_use]
    pub fn tracked(&self) -> Option<&TrackedSet<F>> {
        self.tracked.as_ref()
    }

    /// Forgets the tracked set so the next update runs a full detection.
    pub fn reset(&mut self) {
        self.tracked = None;
        self.frames_passed = 0;
    }

    /// Seeds the player tracker on `bbox` and installs the player in `world`.
    pub fn init_player(&mut self, frame: &F, bbox: BBox, world: &mut World) {
        let mut tracker = self.trackers.create(TrackerRole::Player);
        tracker.init(frame, bbox);
        self.player_tracker = tracker;
        world.set_player(Entity::player(bbox));
        debug!(player = %world.player(), "player tracker initialized");
    }

    /// Whether the coming update will run a full detection.
    #[must_use]
    pub fn full_detection_due(&self) -> bool {
        self.tracked.is_none() || (self.config.detect_rate > 0 && self.frames_passed == 0)
    }

    /// Processes one frame and updates `world`.
    ///
    /// # Errors
    ///
    /// Propagates detector failures. The world may hold a partially updated
    /// player in that case; the entity list is left as it was.
    pub fn update(&mut self, frame: &F, world: &mut World) -> Result<PerceptionReport> {
        let mut events = self.update_player(frame, world)?;

        let mut report = if self.full_detection_due() {
            let request = DetectRequest::full_frame(world.player().bbox);
            let detected = self.detector.detect(frame, &request)?;
            let set = TrackedSet::seed(
                frame,
                detected,
                self.config.tracking_padding,
                self.trackers.as_mut(),
            );
            events |= PerceptionEvents::FULL_DETECTION;
            let report = PerceptionReport {
                tracked: set.len(),
                ..PerceptionReport::default()
            };
            self.tracked = Some(set);
            report
        } else {
            match self.tracked.as_mut() {
                Some(set) => set.update(frame, self.detector.as_mut(), self.trackers.as_mut())?,
                None => PerceptionReport::default(),
            }
        };
        report.events |= events;

        if let Some(set) = &self.tracked {
            world.set_entities(set.to_entities());
        }

        if let Ok(rate) = u32::try_from(self.config.detect_rate) {
            if rate > 0 {
                self.frames_passed = (self.frames_passed + 1) % rate;
            }
        }

        debug!(%report, player = %world.player(), "perception update");
        Ok(report)
    }

    fn update_player(&mut self, frame: &F, world: &mut World) -> Result<PerceptionEvents> {
        if let Some(bbox) = self.player_tracker.update(frame) {
            world.set_player(Entity::player(bbox));
            return Ok(PerceptionEvents::empty());
        }

        let search = world.player().bbox.expanded(self.config.tracking_padding);
        match redetect(frame, &search, self.detector.as_mut())? {
            Some(candidate) => {
                let player = candidate
                    .with_tag(EntityTag::Player)
                    .with_tracked(true);
                let mut tracker = self.trackers.create(TrackerRole::Player);
                tracker.init(frame, player.bbox);
                self.player_tracker = tracker;
                debug!(player = %player, "player redetected");
                world.set_player(player);
                Ok(PerceptionEvents::PLAYER_RECOVERED)
            }
            None => {
                let stale = world.player().clone().with_tracked(false);
                warn!(player = %stale, "player lost");
                world.set_player(stale);
                Ok(PerceptionEvents::PLAYER_LOST)
            }
        }
    }
}
