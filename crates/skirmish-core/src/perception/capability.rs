//! Capability traits supplied by the host.
//!
//! The core never touches pixels. Frame capture, contour detection and
//! template tracking are provided through these traits, so the same pipeline
//! runs against a live screen or the synthetic arena in `skirmish-sim`.
//!
//! # Contracts
//!
//! - [`Frame::crop`] receives a region already clamped to the frame and
//!   snapped to whole pixels.
//! - [`Detector::detect`] returns entities in frame coordinates: boxes found
//!   in a cropped frame are shifted by [`DetectRequest::origin`].
//! - [`Tracker::update`] returns `None` when the target is lost; loss is
//!   never an error.

use std::fmt;

use planar::{BBox, Extent, Vector2};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::Result;

// =============================================================================
// Frames
// =============================================================================

/// A captured image.
pub trait Frame {
    /// Width and height in pixels.
    fn size(&self) -> Extent;

    /// Sub-image covering `region`.
    ///
    /// The region lies within the frame and has integer coordinates.
    #[must_use]
    fn crop(&self, region: &BBox) -> Self
    where
        Self: Sized;
}

/// Produces frames on demand.
pub trait FrameSource<F: Frame> {
    /// Capture the next frame.
    ///
    /// `Ok(None)` means no frame is available right now; the caller skips
    /// this iteration.
    ///
    /// # Errors
    ///
    /// [`SkirmishError::FrameSource`](crate::error::SkirmishError::FrameSource)
    /// if capture failed.
    fn acquire(&mut self) -> Result<Option<F>>;
}

// =============================================================================
// Detection
// =============================================================================

/// Parameters of one detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectRequest {
    /// Maximum number of entities to return; `None` for no limit
    pub limit: Option<usize>,
    /// Offset added to every detected box
    pub origin: Vector2,
    /// Detections overlapping this box are dropped
    pub exclude: Option<BBox>,
}

impl DetectRequest {
    /// Full-frame detection ignoring anything that overlaps `exclude`.
    #[must_use]
    pub fn full_frame(exclude: BBox) -> Self {
        Self {
            limit: None,
            origin: Vector2::ZERO,
            exclude: Some(exclude),
        }
    }

    /// Single-entity detection in a crop whose top-left is `origin`.
    #[must_use]
    pub fn single_at(origin: Vector2) -> Self {
        Self {
            limit: Some(1),
            origin,
            exclude: None,
        }
    }

    /// Whether `count` detections already satisfy the limit.
    #[must_use]
    pub fn is_satisfied(&self, count: usize) -> bool {
        self.limit.is_some_and(|limit| count >= limit)
    }

    /// Whether a frame-space box is excluded.
    #[must_use]
    pub fn excludes(&self, bbox: &BBox) -> bool {
        self.exclude.is_some_and(|ex| ex.overlaps(bbox))
    }
}

/// Finds entities in a frame.
pub trait Detector<F: Frame> {
    /// Detect entities according to `request`.
    ///
    /// # Errors
    ///
    /// [`SkirmishError::Detector`](crate::error::SkirmishError::Detector)
    /// if the detector itself failed. Finding nothing is `Ok(vec![])`.
    fn detect(&mut self, frame: &F, request: &DetectRequest) -> Result<Vec<Entity>>;
}

// =============================================================================
// Tracking
// =============================================================================

/// What a tracker is following.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackerRole {
    /// The controlled entity; factories may pick a slower, steadier tracker
    Player,
    /// Any other perceived entity
    Entity,
}

impl fmt::Display for TrackerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerRole::Player => write!(f, "Player"),
            TrackerRole::Entity => write!(f, "Entity"),
        }
    }
}

/// Follows one box from frame to frame.
pub trait Tracker<F: Frame> {
    /// Start following `bbox` in `frame`.
    fn init(&mut self, frame: &F, bbox: BBox);

    /// Locate the target in a new frame, or `None` if it was lost.
    fn update(&mut self, frame: &F) -> Option<BBox>;
}

/// Creates fresh trackers.
pub trait TrackerFactory<F: Frame> {
    /// A new, uninitialized tracker for `role`.
    fn create(&mut self, role: TrackerRole) -> Box<dyn Tracker<F>>;
}
