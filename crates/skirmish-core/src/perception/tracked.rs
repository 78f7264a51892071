//! The tracked set: perceived entities paired with their trackers.
//!
//! Trackers are seeded on a padded box and report padded boxes back; the
//! padding is stripped before the box is stored, so entity boxes are always
//! un-padded.

use std::fmt;

use planar::{BBox, Extent};
use tracing::debug;

use super::capability::{Detector, Frame, Tracker, TrackerFactory, TrackerRole};
use super::redetect;
use super::report::PerceptionReport;
use crate::entity::Entity;
use crate::error::Result;

/// How one entry fared during [`TrackedSet::update`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TrackStatus {
    /// The tracker followed the entity
    Tracked,
    /// The tracker lost it but redetection found it again
    Recovered,
    /// Neither tracker nor redetection found it; the box is stale
    Lost,
}

struct TrackedEntry<F: Frame> {
    entity: Entity,
    tracker: Box<dyn Tracker<F>>,
}

/// Perceived entities and one tracker each.
pub struct TrackedSet<F: Frame> {
    entries: Vec<TrackedEntry<F>>,
    padding: Extent,
}

impl<F: Frame> fmt::Debug for TrackedSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedSet")
            .field(
                "entities",
                &self.entries.iter().map(|e| &e.entity).collect::<Vec<_>>(),
            )
            .field("padding", &self.padding)
            .finish()
    }
}

impl<F: Frame> TrackedSet<F> {
    /// Creates an empty set.
    #[must_use]
    pub fn new(padding: Extent) -> Self {
        Self {
            entries: Vec::new(),
            padding,
        }
    }

    /// Builds a set from freshly detected entities, one new tracker each.
    ///
    /// Every entity starts tracked.
    ///
    /// # Arguments
    ///
    /// * `frame` - Frame the entities were detected in
    /// * `entities` - Detected entities in frame coordinates
    /// * `padding` - Margin added around each box before seeding its tracker
    /// * `factory` - Source of trackers
    pub fn seed(
        frame: &F,
        entities: Vec<Entity>,
        padding: Extent,
        factory: &mut dyn TrackerFactory<F>,
    ) -> Self {
        let mut set = Self::new(padding);
        for entity in entities {
            set.insert(frame, entity, factory);
        }
        set
    }

    /// Adds an entity with a fresh tracker seeded on its padded box.
    pub fn insert(&mut self, frame: &F, entity: Entity, factory: &mut dyn TrackerFactory<F>) {
        let tracker = self.start_tracker(frame, &entity.bbox, factory);
        self.entries.push(TrackedEntry {
            entity: entity.with_tracked(true),
            tracker,
        });
    }

    fn start_tracker(
        &self,
        frame: &F,
        bbox: &BBox,
        factory: &mut dyn TrackerFactory<F>,
    ) -> Box<dyn Tracker<F>> {
        let mut tracker = factory.create(TrackerRole::Entity);
        tracker.init(frame, bbox.expanded(self.padding));
        tracker
    }

    /// Padding applied around tracked boxes.
    #[must_use]
    pub const fn padding(&self) -> Extent {
        self.padding
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entities in detection order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entries.iter().map(|e| &e.entity)
    }

    /// Owned copy of the entities, for installing into the world.
    #[must_use]
    pub fn to_entities(&self) -> Vec<Entity> {
        self.entities().cloned().collect()
    }

    /// Advances every tracker by one frame.
    ///
    /// Entities whose tracker fails are redetected in a padded crop around
    /// their last box. A candidate replaces the entity and gets a new
    /// tracker; without one the entity keeps its stale box, flagged
    /// untracked, and is retried next frame. Entities are never dropped.
    ///
    /// # Errors
    ///
    /// Propagates detector failures during redetection.
    pub fn update(
        &mut self,
        frame: &F,
        detector: &mut dyn Detector<F>,
        factory: &mut dyn TrackerFactory<F>,
    ) -> Result<PerceptionReport> {
        let mut report = PerceptionReport::default();
        let padding = self.padding;

        for entry in &mut self.entries {
            let status = Self::update_entry(entry, frame, padding, detector, factory)?;
            match status {
                TrackStatus::Tracked => report.tracked += 1,
                TrackStatus::Recovered => report.recovered += 1,
                TrackStatus::Lost => report.lost += 1,
            }
        }
        Ok(report)
    }

    fn update_entry(
        entry: &mut TrackedEntry<F>,
        frame: &F,
        padding: Extent,
        detector: &mut dyn Detector<F>,
        factory: &mut dyn TrackerFactory<F>,
    ) -> Result<TrackStatus> {
        if let Some(padded) = entry.tracker.update(frame) {
            entry.entity.bbox = padded.shrunk(padding);
            entry.entity.tracked = true;
            return Ok(TrackStatus::Tracked);
        }

        let search = entry.entity.bbox.expanded(padding);
        match redetect(frame, &search, detector)? {
            Some(candidate) => {
                debug!(tag = %candidate.tag, center = %candidate.center(), "entity redetected");
                let mut tracker = factory.create(TrackerRole::Entity);
                tracker.init(frame, candidate.bbox.expanded(padding));
                entry.tracker = tracker;
                entry.entity = candidate.with_tracked(true);
                Ok(TrackStatus::Recovered)
            }
            None => {
                entry.entity.tracked = false;
                Ok(TrackStatus::Lost)
            }
        }
    }
}
