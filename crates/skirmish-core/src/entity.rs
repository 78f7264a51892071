//! Perceived entities.
//!
//! An [`Entity`] is whatever the detector found on screen: a box, a tag and a
//! flag saying whether its tracker kept hold of it this frame. The controlled
//! entity itself is an ordinary `Entity` tagged [`EntityTag::Player`].
//!
//! # Example
//!
//! ```
//! use planar::{BBox, Vector2};
//! use skirmish_core::entity::{Entity, EntityTag};
//!
//! let square = Entity::new(EntityTag::Square, BBox::new(50.0, 0.0, 10.0, 10.0));
//! assert_eq!(square.center(), Vector2::new(55.0, 5.0));
//! assert!(square.tracked);
//! ```

use std::fmt;

use planar::{BBox, Vector2};
use serde::{Deserialize, Serialize};

/// What a perceived entity is.
///
/// # Variants
///
/// - `Player`: the controlled entity
/// - `Square`, `Triangle`, `Pentagon`: scoring shapes
/// - `Ally`, `Enemy`: other agents in the arena
/// - `Unknown`: detected but not classified
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// The controlled entity
    Player,
    /// Yellow square
    Square,
    /// Red triangle
    Triangle,
    /// Blue pentagon
    Pentagon,
    /// Friendly agent
    Ally,
    /// Hostile agent
    Enemy,
    /// Unclassified contour
    Unknown,
}

impl EntityTag {
    /// All tags in declaration order.
    pub const ALL: [EntityTag; 7] = [
        EntityTag::Player,
        EntityTag::Square,
        EntityTag::Triangle,
        EntityTag::Pentagon,
        EntityTag::Ally,
        EntityTag::Enemy,
        EntityTag::Unknown,
    ];

    /// Base importance used when ranking targets.
    #[must_use]
    pub const fn base_score(self) -> f64 {
        match self {
            EntityTag::Square => 10.0,
            EntityTag::Triangle => 100.0,
            EntityTag::Pentagon => 200.0,
            EntityTag::Player | EntityTag::Ally | EntityTag::Enemy | EntityTag::Unknown => 0.0,
        }
    }

    /// Whether this tag is one of the scoring shapes.
    #[must_use]
    pub const fn is_shape(self) -> bool {
        matches!(
            self,
            EntityTag::Square | EntityTag::Triangle | EntityTag::Pentagon
        )
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityTag::Player => write!(f, "Player"),
            EntityTag::Square => write!(f, "Square"),
            EntityTag::Triangle => write!(f, "Triangle"),
            EntityTag::Pentagon => write!(f, "Pentagon"),
            EntityTag::Ally => write!(f, "Ally"),
            EntityTag::Enemy => write!(f, "Enemy"),
            EntityTag::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A perceived entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Classification
    pub tag: EntityTag,
    /// Last known screen-space box, never padded
    pub bbox: BBox,
    /// Optional distance annotation supplied by the caller
    pub distance: Option<f64>,
    /// Whether the tracker succeeded (or redetection recovered it) this frame
    pub tracked: bool,
}

impl Entity {
    /// Create a freshly detected entity. New entities start tracked.
    #[must_use]
    pub const fn new(tag: EntityTag, bbox: BBox) -> Self {
        Self {
            tag,
            bbox,
            distance: None,
            tracked: true,
        }
    }

    /// Create the controlled entity.
    #[must_use]
    pub const fn player(bbox: BBox) -> Self {
        Self::new(EntityTag::Player, bbox)
    }

    /// Center of the entity's box.
    #[must_use]
    pub fn center(&self) -> Vector2 {
        self.bbox.center()
    }

    /// Copy with a different tag.
    #[must_use]
    pub fn with_tag(mut self, tag: EntityTag) -> Self {
        self.tag = tag;
        self
    }

    /// Copy with the tracked flag set.
    #[must_use]
    pub fn with_tracked(mut self, tracked: bool) -> Self {
        self.tracked = tracked;
        self
    }

    /// Copy annotated with a distance.
    #[must_use]
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    /// Whether this is the controlled entity.
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.tag == EntityTag::Player
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {} ({}x{})",
            self.tag,
            self.center(),
            self.bbox.width(),
            self.bbox.height()
        )
    }
}
